//! URL helper functions

/// Build an image source URL from the media host and an upload path
///
/// Plain concatenation: the upload path is expected to start with `/`.
///
/// # Examples
/// ```ignore
/// media_url("http://localhost:1337", "/uploads/img.jpg") // -> "http://localhost:1337/uploads/img.jpg"
/// ```
pub fn media_url(media_host: &str, path: &str) -> String {
    format!("{}{}", media_host, path)
}

/// Output file path (relative to the public dir) for a site-relative URL path
///
/// # Examples
/// ```ignore
/// output_path_for("/course/1") // -> "course/1/index.html"
/// ```
pub fn output_path_for(url_path: &str) -> String {
    let trimmed = url_path.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}
