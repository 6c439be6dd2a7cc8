//! Flattening of error chains into one message.

use std::error::Error;

/// Separator placed between the messages of nested causes.
pub const CAUSE_SEPARATOR: &str = "\r\n";

/// Message of `err` followed by the messages of its causes, outermost first.
pub fn exception_message(err: &(dyn Error + 'static)) -> String {
    exception_message_with(err, "")
}

/// Same as `exception_message`, appended to an earlier message.
///
/// The walk stops at the first cause whose message is blank; that cause and
/// everything beneath it are left out.
pub fn exception_message_with(err: &(dyn Error + 'static), prior: &str) -> String {
    let mut message = if prior.trim().is_empty() {
        err.to_string()
    } else {
        format!("{prior}{CAUSE_SEPARATOR}{err}")
    };

    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if text.trim().is_empty() {
            break;
        }
        message.push_str(CAUSE_SEPARATOR);
        message.push_str(&text);
        cause = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|s| s as &(dyn Error + 'static))
        }
    }

    fn chain(messages: &[&'static str]) -> Layer {
        let mut layer: Option<Box<Layer>> = None;
        for &message in messages.iter().rev() {
            layer = Some(Box::new(Layer { message, source: layer }));
        }
        *layer.unwrap()
    }

    #[test]
    fn test_single_error() {
        assert_eq!(exception_message(&chain(&["boom"])), "boom");
    }

    #[test]
    fn test_nested_causes_outermost_first() {
        let err = chain(&["request failed", "body unreadable", "connection reset"]);
        assert_eq!(
            exception_message(&err),
            "request failed\r\nbody unreadable\r\nconnection reset"
        );
    }

    #[test]
    fn test_blank_cause_stops_walk() {
        let err = chain(&["outer", "  ", "hidden"]);
        assert_eq!(exception_message(&err), "outer");
    }

    #[test]
    fn test_prior_message() {
        let err = chain(&["outer", "inner"]);
        assert_eq!(exception_message_with(&err, "context"), "context\r\nouter\r\ninner");
        assert_eq!(exception_message_with(&err, " "), "outer\r\ninner");
    }

    #[test]
    fn test_exchange_error_chain() {
        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        let err = crate::error::ExchangeError::from(json_err);
        let message = exception_message(&err);
        assert!(message.starts_with("invalid JSON\r\n"));
        assert!(message.contains("expected value"));
    }
}
