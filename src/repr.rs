use std::fmt::Write;

use serde_json::{Number, Value};
use unicode_general_category::{GeneralCategory, get_general_category};

pub fn python_repr(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

pub fn python_dict_repr(entries: &[(&str, Value)]) -> String {
    let mut out = String::from("{");
    for (index, (key, value)) in entries.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_str(&mut out, key);
        out.push_str(": ");
        write_value(&mut out, value);
    }
    out.push('}');
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(number) => write_number(out, number),
        Value::String(text) => write_str(out, text),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (index, (key, item)) in map.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_str(out, key);
                out.push_str(": ");
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, number: &Number) {
    if let Some(value) = number.as_i64() {
        let _ = write!(out, "{value}");
    } else if let Some(value) = number.as_u64() {
        let _ = write!(out, "{value}");
    } else if is_integer_literal(number) {
        out.push_str(&number.to_string());
    } else if let Some(value) = number.as_f64() {
        out.push_str(&float_repr(value));
    } else {
        out.push_str(&number.to_string());
    }
}

// Integers wider than 64 bits keep their literal digits.
fn is_integer_literal(number: &Number) -> bool {
    !number.to_string().contains(['.', 'e', 'E'])
}

// Shortest round-trip digits; scientific below 1e-4 and from 1e16 up.
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{value:e}");
    let (mantissa, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if (-4..16).contains(&exponent) {
        let mut out = String::from(sign);
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() > int_len {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            } else {
                out.push_str(&digits);
                out.push_str(&"0".repeat(int_len - digits.len()));
                out.push_str(".0");
            }
        } else {
            out.push_str("0.");
            out.push_str(&"0".repeat((-exponent - 1) as usize));
            out.push_str(&digits);
        }
        out
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{sign}{lead}e{exp_sign}{:02}", exponent.abs())
        } else {
            format!("{sign}{lead}.{rest}e{exp_sign}{:02}", exponent.abs())
        }
    }
}

fn write_str(out: &mut String, text: &str) {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                if code <= 0xff {
                    let _ = write!(out, "\\x{code:02x}");
                } else if code <= 0xffff {
                    let _ = write!(out, "\\u{code:04x}");
                } else {
                    let _ = write!(out, "\\U{code:08x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::SpaceSeparator
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{float_repr, python_dict_repr, python_repr};

    #[test]
    fn scalars_use_python_spelling() {
        assert_eq!(python_repr(&json!(null)), "None");
        assert_eq!(python_repr(&json!(true)), "True");
        assert_eq!(python_repr(&json!(false)), "False");
        assert_eq!(python_repr(&json!(1)), "1");
        assert_eq!(python_repr(&json!(-17)), "-17");
        assert_eq!(python_repr(&json!(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn integers_wider_than_u64_keep_their_digits() {
        let value: serde_json::Value =
            serde_json::from_str("[123456789012345678901234567890, -98765432109876543210, 1E3]")
                .expect("json");
        assert_eq!(
            python_repr(&value),
            "[123456789012345678901234567890, -98765432109876543210, 1000.0]"
        );
    }

    #[test]
    fn strings_prefer_single_quotes() {
        assert_eq!(python_repr(&json!("y")), "'y'");
        assert_eq!(python_repr(&json!("it's")), "\"it's\"");
        assert_eq!(python_repr(&json!("say \"hi\"")), "'say \"hi\"'");
        assert_eq!(python_repr(&json!("both ' and \"")), "'both \\' and \"'");
    }

    #[test]
    fn strings_escape_control_characters() {
        assert_eq!(python_repr(&json!("a\nb\tc\\d")), "'a\\nb\\tc\\\\d'");
        assert_eq!(python_repr(&json!("\u{1}")), "'\\x01'");
        assert_eq!(python_repr(&json!("café")), "'café'");
    }

    #[test]
    fn strings_escape_non_printable_characters() {
        assert_eq!(python_repr(&json!("a\u{a0}b")), "'a\\xa0b'");
        assert_eq!(python_repr(&json!("\u{200b}")), "'\\u200b'");
        assert_eq!(python_repr(&json!("\u{2028}x\u{feff}")), "'\\u2028x\\ufeff'");
        assert_eq!(python_repr(&json!("\u{f0000}")), "'\\U000f0000'");
        assert_eq!(python_repr(&json!("a b\u{3042}")), "'a b\u{3042}'");
    }

    #[test]
    fn floats_follow_shortest_repr_layout() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(2.5), "2.5");
        assert_eq!(float_repr(-0.5), "-0.5");
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(0.1), "0.1");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.00001), "1e-05");
        assert_eq!(float_repr(1.5e-7), "1.5e-07");
        assert_eq!(float_repr(123.456), "123.456");
        assert_eq!(float_repr(1e15), "1000000000000000.0");
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(2.5e20), "2.5e+20");
    }

    #[test]
    fn containers_use_literal_syntax() {
        assert_eq!(python_repr(&json!([])), "[]");
        assert_eq!(python_repr(&json!({})), "{}");
        assert_eq!(
            python_repr(&json!({"b": [1, 2.0], "a": {"c": "d"}})),
            "{'b': [1, 2.0], 'a': {'c': 'd'}}"
        );
    }

    #[test]
    fn dict_repr_keeps_entry_order() {
        assert_eq!(
            python_dict_repr(&[("name", json!("foo")), ("content", json!("42"))]),
            "{'name': 'foo', 'content': '42'}"
        );
    }
}
