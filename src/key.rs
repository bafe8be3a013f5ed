/// Semantic key produced from one raw terminal read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    None,
    Char(char),
    Backspace,
    Enter,
    Escape,
    Up,
    Down,
    CtrlC,
}

impl Key {
    pub fn is_none(&self) -> bool {
        matches!(self, Key::None)
    }
}

const CTRL_C: u8 = 0x03;
const BS: u8 = 0x08;
const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// Decode one raw chunk read from a terminal in raw mode.
///
/// Never fails: anything unrecognized (including an empty read) maps to
/// [`Key::None`]. When a multi-byte character is cut off by the end of the
/// chunk, only the lead byte is decoded (as a Latin-1 code point).
pub fn decode(chunk: &[u8]) -> Key {
    match chunk {
        [] => Key::None,
        [CTRL_C] => Key::CtrlC,
        [ESC] => Key::Escape,
        [DEL] | [BS] => Key::Backspace,
        [b'\r'] | [b'\n'] => Key::Enter,
        [ESC, b'[', b'A'] => Key::Up,
        [ESC, b'[', b'B'] => Key::Down,
        [lead, ..] if *lead >= 0x20 => decode_char(chunk),
        _ => Key::None,
    }
}

fn decode_char(chunk: &[u8]) -> Key {
    let lead = chunk[0];
    let width = utf8_width(lead);

    if chunk.len() < width {
        return Key::Char(char::from(lead));
    }

    match std::str::from_utf8(&chunk[..width]) {
        Ok(s) => match s.chars().next() {
            Some(c) if !c.is_control() => Key::Char(c),
            _ => Key::None,
        },
        Err(_) => Key::None,
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_bytes() {
        assert_eq!(decode(&[0x03]), Key::CtrlC);
        assert_eq!(decode(&[0x1b]), Key::Escape);
        assert_eq!(decode(&[0x7f]), Key::Backspace);
        assert_eq!(decode(&[0x08]), Key::Backspace);
        assert_eq!(decode(b"\r"), Key::Enter);
        assert_eq!(decode(b"\n"), Key::Enter);
    }

    #[test]
    fn test_arrow_sequences() {
        assert_eq!(decode(&[0x1b, b'[', b'A']), Key::Up);
        assert_eq!(decode(&[0x1b, b'[', b'B']), Key::Down);
        assert_eq!(decode(&[0x1b, b'[', b'C']), Key::None);
        assert_eq!(decode(&[0x1b, b'[', b'D']), Key::None);
    }

    #[test]
    fn test_other_escape_sequences_are_ignored() {
        assert_eq!(decode(&[0x1b, b'O', b'P']), Key::None);
        assert_eq!(decode(&[0x1b, b'[', b'1', b'~']), Key::None);
    }

    #[test]
    fn test_empty_read() {
        assert_eq!(decode(&[]), Key::None);
        assert!(decode(&[]).is_none());
    }

    #[test]
    fn test_ascii_printable() {
        assert_eq!(decode(b"a"), Key::Char('a'));
        assert_eq!(decode(b" "), Key::Char(' '));
        assert_eq!(decode(b"~"), Key::Char('~'));
    }

    #[test]
    fn test_unlisted_control_bytes() {
        assert_eq!(decode(&[0x09]), Key::None);
        assert_eq!(decode(&[0x00]), Key::None);
        assert_eq!(decode(&[0x7f, b'a']), Key::None);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(decode("é".as_bytes()), Key::Char('é'));
        assert_eq!(decode("€".as_bytes()), Key::Char('€'));
        assert_eq!(decode("你".as_bytes()), Key::Char('你'));
        assert_eq!(decode("🦀".as_bytes()), Key::Char('🦀'));
    }

    #[test]
    fn test_only_first_character_of_chunk() {
        assert_eq!(decode(b"abc"), Key::Char('a'));
        assert_eq!(decode("€x".as_bytes()), Key::Char('€'));
    }

    #[test]
    fn test_truncated_sequence_falls_back_to_lead_byte() {
        let euro = "€".as_bytes();
        assert_eq!(decode(&euro[..2]), Key::Char(char::from(euro[0])));
    }

    #[test]
    fn test_invalid_continuation_is_ignored() {
        assert_eq!(decode(&[0xe2, b'a', b'b']), Key::None);
    }
}
