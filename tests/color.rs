use faulty_terminal::{hex_to_rgb, parse_hex, ColorError};

#[test]
fn black_and_white() {
    assert_eq!(hex_to_rgb("#000000"), [0.0, 0.0, 0.0]);
    assert_eq!(hex_to_rgb("#ffffff"), [1.0, 1.0, 1.0]);
}

#[test]
fn channels_keep_eight_bit_precision() {
    assert_eq!(hex_to_rgb("#ff8000"), [1.0, 128.0 / 255.0, 0.0]);
    assert_eq!(
        hex_to_rgb("#84bd7d"),
        [132.0 / 255.0, 189.0 / 255.0, 125.0 / 255.0]
    );
}

#[test]
fn short_form_expands_each_digit() {
    assert_eq!(hex_to_rgb("abc"), hex_to_rgb("#aabbcc"));
    assert_eq!(
        hex_to_rgb("abc"),
        [170.0 / 255.0, 187.0 / 255.0, 204.0 / 255.0]
    );
    assert_eq!(hex_to_rgb("#F80"), hex_to_rgb("ff8800"));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(parse_hex("  #00ff00 "), Ok([0.0, 1.0, 0.0]));
}

#[test]
fn malformed_input_is_rejected_and_renders_black() {
    assert_eq!(parse_hex("#12345"), Err(ColorError::Length("#12345".into())));
    assert_eq!(parse_hex("#ggg"), Err(ColorError::Digits("#ggg".into())));
    assert!(parse_hex("+abcde").is_err());
    assert_eq!(hex_to_rgb("not a color"), [0.0, 0.0, 0.0]);
}
