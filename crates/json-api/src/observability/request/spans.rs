//! HTTP span helpers.

use uuid::Uuid;

/// Collapses ids in a request path so that spans group by route, e.g.
/// `/products/101/presets` becomes `/products/{id}/presets`.
pub(super) fn request_span_name(method: &str, path: &str) -> String {
    format!("{method} {}", normalise_path_for_span_name(path))
}

fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");
    let mut previous = "";

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else if !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()) {
            normalised.push_str("{id}");
        } else if previous == "lines" {
            normalised.push_str("{line_key}");
        } else {
            normalised.push_str(segment);
        }

        previous = segment;
    }

    normalised
}
