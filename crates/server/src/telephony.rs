//! Telephony markup rendering
//!
//! Turns reply text into the provider's TwiML-shaped XML: speak the reply,
//! then either gather the next utterance or hang up. Whether to hang up is
//! decided by the state machine, never by inspecting the reply text.

/// Webhook the provider posts recognized speech back to
pub const SPEECH_ACTION: &str = "/voice/speech";

const VOICE: &str = "alice";
const LANGUAGE: &str = "en-US";

/// Render one spoken reply
pub fn render(text: &str, hangup: bool) -> String {
    let say = format!(
        r#"<Say voice="{}" language="{}">{}</Say>"#,
        VOICE,
        LANGUAGE,
        escape(text)
    );

    let tail = if hangup {
        "<Hangup/>".to_string()
    } else {
        format!(
            r#"<Gather input="speech" action="{}" method="POST" speechTimeout="auto" language="{}"/>"#,
            SPEECH_ACTION, LANGUAGE
        )
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response>{}{}</Response>"#,
        say, tail
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_listening() {
        let xml = render("What is your name?", false);

        assert!(xml.starts_with(r#"<?xml version="1.0""#));
        assert!(xml.contains("What is your name?"));
        assert!(xml.contains("<Gather"));
        assert!(xml.contains(SPEECH_ACTION));
        assert!(!xml.contains("<Hangup/>"));
    }

    #[test]
    fn test_render_hangup() {
        let xml = render("Goodbye!", true);

        assert!(xml.contains("<Hangup/>"));
        assert!(!xml.contains("<Gather"));
    }

    #[test]
    fn test_escapes_reply_text() {
        let xml = render("Tom & Jerry's <pipes>", false);

        assert!(xml.contains("Tom &amp; Jerry&apos;s &lt;pipes&gt;"));
        assert!(!xml.contains("Jerry's <pipes>"));
    }
}
