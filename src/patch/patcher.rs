//! Applies a [`HeaderPolicy`] to a header set.

use axum::http::{HeaderMap, HeaderName};

use crate::patch::policy::HeaderPolicy;

/// Patch `headers` in place according to `policy`.
///
/// Stages run in a fixed order: allow, remove, static, callback. Each stage
/// is skipped when its policy field is `None`. Name matching in the filter
/// stages ignores ASCII case. A panicking callback is not caught.
pub fn patch(policy: &HeaderPolicy, headers: &mut HeaderMap) {
    if let Some(allow) = &policy.allow {
        let removed = retain_names(headers, |name| includes_ignore_case(allow, name));
        tracing::trace!(removed, "allow filter applied");
    }

    if let Some(remove) = &policy.remove {
        let removed = retain_names(headers, |name| !includes_ignore_case(remove, name));
        tracing::trace!(removed, "remove filter applied");
    }

    if let Some(statics) = &policy.static_headers {
        for (name, values) in statics {
            // null and empty entries are neither set nor removed
            let Some(values) = values.as_deref().filter(|v| !v.is_empty()) else {
                continue;
            };
            headers.remove(name);
            for value in values {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    if let Some(callback) = &policy.callback {
        let current = std::mem::take(headers);
        *headers = callback.call(current);
        tracing::trace!(count = headers.len(), "callback replaced headers");
    }

    tracing::debug!(count = headers.len(), "response headers patched");
}

fn includes_ignore_case(names: &[String], name: &HeaderName) -> bool {
    let name = name.as_str();
    names.iter().any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// Remove every header whose name fails `keep`. Returns the number of
/// distinct names removed.
fn retain_names<F>(headers: &mut HeaderMap, keep: F) -> usize
where
    F: Fn(&HeaderName) -> bool,
{
    let doomed: Vec<HeaderName> = headers.keys().filter(|&name| !keep(name)).cloned().collect();
    for name in &doomed {
        headers.remove(name);
    }
    doomed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_ab() -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("a", HeaderValue::from_static("1"));
        h.insert("b", HeaderValue::from_static("2"));
        h
    }

    fn get<'a>(h: &'a HeaderMap, name: &str) -> Option<&'a str> {
        h.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_empty_policy_keeps_headers() {
        let mut h = headers_ab();
        patch(&HeaderPolicy::new(), &mut h);
        assert_eq!(h, headers_ab());
    }

    #[test]
    fn test_empty_policy_on_empty_headers() {
        let mut h = HeaderMap::new();
        patch(&HeaderPolicy::new(), &mut h);
        assert!(h.is_empty());
    }

    #[test]
    fn test_allow_keeps_listed() {
        let mut h = headers_ab();
        patch(&HeaderPolicy::new().allow(["a"]), &mut h);
        assert_eq!(h.len(), 1);
        assert_eq!(get(&h, "a"), Some("1"));
    }

    #[test]
    fn test_allow_ignores_case() {
        let mut h = headers_ab();
        patch(&HeaderPolicy::new().allow(["A"]), &mut h);
        assert_eq!(h.len(), 1);
        assert_eq!(get(&h, "a"), Some("1"));
    }

    #[test]
    fn test_empty_allow_removes_everything() {
        let mut h = headers_ab();
        patch(&HeaderPolicy::new().allow(Vec::<String>::new()), &mut h);
        assert!(h.is_empty());
    }

    #[test]
    fn test_remove_drops_listed() {
        let mut h = headers_ab();
        patch(&HeaderPolicy::new().remove(["a"]), &mut h);
        assert_eq!(h.len(), 1);
        assert_eq!(get(&h, "b"), Some("2"));
    }

    #[test]
    fn test_remove_ignores_case() {
        let mut h = headers_ab();
        patch(&HeaderPolicy::new().remove(["A"]), &mut h);
        assert_eq!(h.len(), 1);
        assert_eq!(get(&h, "b"), Some("2"));
    }

    #[test]
    fn test_remove_drops_every_value_of_multi_valued_header() {
        let mut h = headers_ab();
        h.append("set-cookie", HeaderValue::from_static("x=1"));
        h.append("set-cookie", HeaderValue::from_static("y=2"));
        patch(&HeaderPolicy::new().remove(["Set-Cookie"]), &mut h);
        assert!(h.get("set-cookie").is_none());
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_static_adds_header() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new()
            .static_header(HeaderName::from_static("c"), Some(HeaderValue::from_static("3")));
        patch(&policy, &mut h);
        assert_eq!(h.len(), 3);
        assert_eq!(get(&h, "a"), Some("1"));
        assert_eq!(get(&h, "b"), Some("2"));
        assert_eq!(get(&h, "c"), Some("3"));
    }

    #[test]
    fn test_static_overwrites_existing() {
        let mut h = headers_ab();
        h.append("a", HeaderValue::from_static("extra"));
        let policy = HeaderPolicy::new()
            .static_header(HeaderName::from_static("a"), Some(HeaderValue::from_static("9")));
        patch(&policy, &mut h);
        let values: Vec<_> = h.get_all("a").iter().cloned().collect();
        assert_eq!(values, vec![HeaderValue::from_static("9")]);
    }

    #[test]
    fn test_static_null_is_skipped() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new()
            .static_header(HeaderName::from_static("a"), None)
            .static_header(HeaderName::from_static("z"), None);
        patch(&policy, &mut h);
        assert_eq!(h, headers_ab());
    }

    #[test]
    fn test_static_empty_value_list_keeps_header() {
        let mut h = headers_ab();
        h.insert("server", HeaderValue::from_static("x"));
        let policy = HeaderPolicy::new().static_values(HeaderName::from_static("server"), Some(vec![]));
        patch(&policy, &mut h);
        assert_eq!(get(&h, "server"), Some("x"));
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_static_multiple_values() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new().static_values(
            HeaderName::from_static("vary"),
            Some(vec![
                HeaderValue::from_static("origin"),
                HeaderValue::from_static("accept"),
            ]),
        );
        patch(&policy, &mut h);
        let values: Vec<_> = h.get_all("vary").iter().filter_map(|v| v.to_str().ok()).collect();
        assert_eq!(values, vec!["origin", "accept"]);
    }

    #[test]
    fn test_static_reintroduces_filtered_header() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new()
            .remove(["b"])
            .static_header(HeaderName::from_static("b"), Some(HeaderValue::from_static("new")));
        patch(&policy, &mut h);
        assert_eq!(get(&h, "b"), Some("new"));
    }

    #[test]
    fn test_callback_changes_headers() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new().callback(|mut headers| {
            let a: u32 = headers
                .get("a")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or_default();
            headers.insert("a", HeaderValue::from(a + 2));
            headers
        });
        patch(&policy, &mut h);
        assert_eq!(h.len(), 2);
        assert_eq!(get(&h, "a"), Some("3"));
        assert_eq!(get(&h, "b"), Some("2"));
    }

    #[test]
    fn test_callback_replaces_wholesale() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new().callback(|_| {
            let mut fresh = HeaderMap::new();
            fresh.insert("only", HeaderValue::from_static("me"));
            fresh
        });
        patch(&policy, &mut h);
        assert_eq!(h.len(), 1);
        assert_eq!(get(&h, "only"), Some("me"));
    }

    #[test]
    fn test_callback_sees_static_overrides() {
        let mut h = headers_ab();
        let policy = HeaderPolicy::new()
            .allow(["a"])
            .static_header(HeaderName::from_static("c"), Some(HeaderValue::from_static("3")))
            .callback(|headers| {
                assert!(headers.get("b").is_none());
                assert_eq!(headers.get("c").unwrap(), "3");
                headers
            });
        patch(&policy, &mut h);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_allow_then_remove_compose() {
        let mut h = headers_ab();
        h.insert("c", HeaderValue::from_static("3"));
        patch(&HeaderPolicy::new().allow(["a", "b"]).remove(["B"]), &mut h);
        assert_eq!(h.len(), 1);
        assert_eq!(get(&h, "a"), Some("1"));
    }
}
