use http_client::Request;

/// Chrome user agent string sent with every request
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Add common browser headers to a request
pub fn add_common_headers(request: &mut Request) {
    let _ = request.insert_header("User-Agent", USER_AGENT);
    let _ = request.insert_header("Accept-Language", "en-US,en;q=0.9");
    let _ = request.insert_header("DNT", "1");
    let _ = request.insert_header("Connection", "keep-alive");
}

/// Add headers for GET requests.
///
/// Listing pages ask for HTML; audio streams accept anything.
pub fn add_get_headers(request: &mut Request, wants_html: bool) {
    add_common_headers(request);

    if wants_html {
        let _ = request.insert_header("Accept", HTML_ACCEPT);
        let _ = request.insert_header("Upgrade-Insecure-Requests", "1");
    } else {
        let _ = request.insert_header("Accept", "*/*");
    }
}
