//! Digit rendering for strokes that use the number bar.

use crate::stroke::Stroke;

/// Number keys in steno order with their digits.
const DIGITS: [(Stroke, char); 10] = [
    (Stroke::S, '1'),
    (Stroke::T, '2'),
    (Stroke::P, '3'),
    (Stroke::H, '4'),
    (Stroke::A, '5'),
    (Stroke::O, '0'),
    (Stroke::F, '6'),
    (Stroke::P2, '7'),
    (Stroke::L, '8'),
    (Stroke::T2, '9'),
];

/// Render a number-bar stroke as text.
///
/// `EU` reverses the digits, `-D` doubles them, `-Z` appends `00`, `-DZ`
/// makes a dollar amount and `K-` or `-BG` appends `:00`. Returns `None` when
/// the stroke has no number bar, no digit keys, or any other key.
pub fn number_text(stroke: Stroke) -> Option<String> {
    if !stroke.contains(Stroke::NUMBER_BAR) {
        return None;
    }
    let mut rest = stroke - Stroke::NUMBER_BAR;
    let mut digits: Vec<char> = Vec::new();
    for (key, digit) in DIGITS {
        if rest.contains(key) {
            digits.push(digit);
            rest.remove(key);
        }
    }
    if digits.is_empty() {
        return None;
    }

    let mut take = |keys: Stroke| {
        let present = rest.contains(keys);
        if present {
            rest.remove(keys);
        }
        present
    };

    if take(Stroke::E | Stroke::U) {
        digits.reverse();
    }
    let mut text: String = digits.iter().collect();
    if take(Stroke::D | Stroke::Z) {
        text = format!("${}00", text);
    } else {
        if take(Stroke::D) {
            text = text.repeat(2);
        }
        if take(Stroke::Z) {
            text.push_str("00");
        }
    }
    if take(Stroke::K) || take(Stroke::B | Stroke::G) {
        text.push_str(":00");
    }

    if rest.is_empty() {
        Some(text)
    } else {
        None
    }
}
