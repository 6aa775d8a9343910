//! Small XML helpers shared by the writer and the readers.

use quick_xml::escape::escape;
use quick_xml::events::BytesStart;

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of the attribute whose qualified name is `key`.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Value of a relationship-id attribute (`r:id`, `r:embed`, ...) whatever
/// prefix the document binds the relationships namespace to.
pub(crate) fn rel_attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| {
            let key = a.key.as_ref();
            key.contains(&b':') && local_name(key) == local
        })
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Integer attribute, `None` if absent or unparsable.
pub(crate) fn int_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// Escape text or attribute content, dropping characters XML 1.0 forbids.
///
/// `\r` becomes a character reference; a literal one would be folded into
/// the following newline by any conforming reader.
pub(crate) fn escape_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| is_xml_char(c))
        .collect();
    escape(cleaned.as_str()).replace('\r', "&#13;")
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_text("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape_text("bell\u{7}\u{b}"), "bell");
        assert_eq!(escape_text("one\r\ntwo"), "one&#13;\ntwo");
        assert_eq!(escape_text("tab\there"), "tab\there");
    }
}
