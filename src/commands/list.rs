//! List the courses the content API currently returns

use anyhow::Result;

use crate::config::ApiConfig;
use crate::content::{CourseList, CourseLoader, COVER_FORMAT};
use crate::helpers::date_string;
use crate::Site;

/// Fetch the courses and print one line per course
pub async fn run(site: &Site, api: &ApiConfig) -> Result<()> {
    let loader = CourseLoader::new(api.clone(), &site.config.markdown)?;
    let list = loader.load().await?;

    for line in summarize(&list, &site.config.tz()) {
        println!("{}", line);
    }

    Ok(())
}

/// Format the course list for the terminal
fn summarize(list: &CourseList, tz: &chrono_tz::Tz) -> Vec<String> {
    let mut lines = vec![format!("Courses ({}):", list.len())];

    for course in &list.courses {
        let date = course
            .attributes
            .published_at
            .as_ref()
            .map(|d| date_string(d, tz))
            .unwrap_or_else(|| "unpublished".to_string());
        let cover = if course.cover_format(COVER_FORMAT).is_some() {
            ""
        } else {
            " (no cover)"
        };
        lines.push(format!(
            "  {:>4}  {}  {}{}",
            course.id, date, course.attributes.header, cover
        ));
    }

    lines
}
