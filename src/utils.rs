use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// As defined in https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
///
/// Everything except the ASCII alphanumerics and `*`, `-`, `.`, `_` is
/// percent-encoded. Space is left out of the set here since it is written
/// as `+`.
pub const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Appends the form-encoded form of `input` to `output`.
pub fn encode_into(output: &mut String, input: &str) {
    for chunk in percent_encoding::utf8_percent_encode(input, FORM_ENCODE_SET) {
        if chunk.contains(' ') {
            output.extend(chunk.chars().map(|c| if c == ' ' { '+' } else { c }));
        } else {
            output.push_str(chunk);
        }
    }
}

#[inline(always)]
fn char_to_digit(c: u8) -> Option<u32> {
    char::from(c).to_digit(16)
}

/// Decodes a form-encoded key or value:
/// - Replaces `+` with a space
/// - Decodes percent-encoded characters, leaving invalid escapes as they are
/// - Replaces invalid UTF-8 with U+FFFD
pub fn decode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                decoded.push(b' ');
                idx += 1;
            }
            b'%' => {
                let escape = bytes
                    .get(idx + 1)
                    .and_then(|h| char_to_digit(*h))
                    .zip(bytes.get(idx + 2).and_then(|l| char_to_digit(*l)));
                match escape {
                    Some((h, l)) => {
                        decoded.push((h * 0x10 + l) as u8);
                        idx += 3;
                    }
                    None => {
                        decoded.push(b'%');
                        idx += 1;
                    }
                }
            }
            b => {
                decoded.push(b);
                idx += 1;
            }
        }
    }

    Cow::Owned(String::from_utf8_lossy(&decoded).into_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode(input: &str) -> String {
        let mut output = String::new();
        encode_into(&mut output, input);
        output
    }

    #[test]
    fn encodes_form_set() {
        assert_eq!(encode("name"), "name");
        assert_eq!(encode("a b"), "a+b");
        assert_eq!(encode("*-._"), "*-._");
        assert_eq!(encode(r#"{"$t":[]}"#), "%7B%22%24t%22%3A%5B%5D%7D");
        assert_eq!(encode("a|b&c=d+e"), "a%7Cb%26c%3Dd%2Be");
        assert_eq!(encode("é"), "%C3%A9");
    }

    #[test]
    fn decodes_form_set() {
        assert!(matches!(decode("plain"), Cow::Borrowed("plain")));
        assert_eq!(decode("a+b"), "a b");
        assert_eq!(decode("%7B%7d"), "{}");
        assert_eq!(decode("comt%C3%A9"), "comté");
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz%4"), "%zz%4");
        assert_eq!(decode("%FF"), "\u{FFFD}");
    }
}
