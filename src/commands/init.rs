//! Initialize a new catalog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::{API_URL_VAR, TOKEN_VAR};
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Course catalog configuration

# Site
title: Courses
description: IT courses for everyone
favicon: /favicon.ico
language: en
# IANA name used when formatting publish dates
timezone: UTC

# Directory
source_dir: source
public_dir: public

# Media
## Prefix for cover image paths returned by the content API
media_host: http://localhost:1337
placeholder:
  url: /images/placeholder.svg
  width: 750
  height: 500

# Writing
markdown:
  allow_raw_html: false
  highlight: false
  line_numbers: false
  theme: base16-ocean.dark
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("source"))?;
    fs::create_dir_all(target_dir.join("templates"))?;

    fs::write(&config_path, DEFAULT_CONFIG)?;

    let env_example = format!(
        "{}=http://localhost:1337/api\n{}=\n",
        API_URL_VAR, TOKEN_VAR
    );
    fs::write(target_dir.join(".env.example"), env_example)?;

    fs::write(target_dir.join(".gitignore"), "public/\n.env\n")?;

    tracing::info!("Initialized site in {:?}", target_dir);

    Ok(())
}
