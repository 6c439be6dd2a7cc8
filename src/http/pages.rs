//! Fixed error pages.

pub const RESPONSE_404: &str = "<html><head></head><body><h1>404 - Not Found</h1></body></html>";

/// `{0}` takes the message, `{1}` the stack trace.
pub const RESPONSE_500: &str = "<html><head></head><body><h1>500 - Internal Server Error</h1><h2>Message</h2><pre>{0}</pre><h2>Stack Trace</h2><pre>\r\n{1}</pre></body></html>";

/// Fill both slots of `RESPONSE_500`. Values are inserted verbatim.
pub fn render_500(message: &str, trace: &str) -> String {
    let mut page = String::with_capacity(RESPONSE_500.len() + message.len() + trace.len());
    let mut rest = RESPONSE_500;
    for (slot, value) in [("{0}", message), ("{1}", trace)] {
        if let Some((before, after)) = rest.split_once(slot) {
            page.push_str(before);
            page.push_str(value);
            rest = after;
        }
    }
    page.push_str(rest);
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_500() {
        assert_eq!(
            render_500("bad thing", "at main"),
            "<html><head></head><body><h1>500 - Internal Server Error</h1><h2>Message</h2><pre>bad thing</pre><h2>Stack Trace</h2><pre>\r\nat main</pre></body></html>"
        );
    }

    #[test]
    fn test_slots_not_reexpanded() {
        let page = render_500("{1}", "trace");
        assert!(page.contains("<pre>{1}</pre>"));
        assert!(page.ends_with("<pre>\r\ntrace</pre></body></html>"));
    }
}
