use fuser_core::formatting::{compose_relay_text, strip_emphasis_markers};
use fuser_core::types::QuotedMessage;
use proptest::prelude::*;

proptest! {
    /// Stripping twice yields the same text as stripping once.
    #[test]
    fn strip_is_idempotent(s in "\\PC*") {
        let once = strip_emphasis_markers(&s);
        prop_assert_eq!(strip_emphasis_markers(&once), once);
    }

    /// No emphasis marker survives and no surrounding whitespace is left.
    #[test]
    fn strip_removes_all_markers(s in "[a-z *\n\t]*") {
        let out = strip_emphasis_markers(&s);
        prop_assert!(!out.contains('*'));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    /// The annotation always precedes the normalized body after a blank line.
    #[test]
    fn reply_annotation_prefixes_body(
        sender in "[A-Za-z0-9]{1,12}",
        original in "[a-z ]{0,20}",
        body in "[a-z*]{0,20}"
    ) {
        let quoted = QuotedMessage { sender: Some(sender.clone()), text: original.clone() };
        let text = compose_relay_text(&body, Some(&quoted));
        let expected = format!("Replying to {sender}: {original}\n\n{}", strip_emphasis_markers(&body));
        prop_assert_eq!(text, expected);
    }
}
