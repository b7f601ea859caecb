//! Two-line balancing of the greeting printed inside the card.

/// Messages up to this many characters stay on one line.
const SINGLE_LINE_MAX_CHARS: usize = 30;

/// A greeting split at the word boundary closest to its middle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    pub first_line: String,
    pub second_line: String,
    pub should_break: bool,
}

impl FormattedMessage {
    fn single(message: &str) -> Self {
        Self {
            first_line: message.to_string(),
            second_line: String::new(),
            should_break: false,
        }
    }
}

/// Splits `message` into two visually balanced lines.
///
/// Words are separated on single spaces. The split happens before or after
/// the first word whose end reaches the character midpoint, whichever
/// boundary is closer to it (ties go to the earlier boundary). A split that
/// would leave either line empty is dropped.
pub fn format_message_with_line_break(message: &str) -> FormattedMessage {
    let length = message.chars().count();
    if length <= SINGLE_LINE_MAX_CHARS {
        return FormattedMessage::single(message);
    }

    let words: Vec<&str> = message.split(' ').collect();
    let half_length = length / 2;
    let mut char_count = 0;
    let mut split_index = 0;

    for (i, word) in words.iter().enumerate() {
        let word_length = word.chars().count() + usize::from(i > 0);
        if char_count + word_length >= half_length {
            let distance_before = half_length - char_count;
            let distance_after = char_count + word_length - half_length;
            split_index = if distance_before <= distance_after { i } else { i + 1 };
            break;
        }
        char_count += word_length;
    }

    if split_index == 0 || split_index >= words.len() {
        return FormattedMessage::single(message);
    }

    FormattedMessage {
        first_line: words[..split_index].join(" "),
        second_line: words[split_index..].join(" "),
        should_break: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_not_split() {
        for message in ["", "Merry Christmas!", "Thank you for a wonderful year"] {
            assert!(message.chars().count() <= 30);
            let formatted = format_message_with_line_break(message);
            assert!(!formatted.should_break);
            assert_eq!(formatted.first_line, message);
            assert!(formatted.second_line.is_empty());
        }
    }

    #[test]
    fn splits_at_boundary_closest_to_midpoint() {
        let message = "Wishing you a joyful Christmas wrapped in love and laughter.";
        let formatted = format_message_with_line_break(message);
        assert!(formatted.should_break);
        assert_eq!(formatted.first_line, "Wishing you a joyful Christmas");
        assert_eq!(formatted.second_line, "wrapped in love and laughter.");

        // The chosen boundary is no further from the midpoint than the
        // boundary on the other side of the straddling word.
        let half = message.chars().count() / 2;
        let chosen = formatted.first_line.chars().count();
        let other = "Wishing you a joyful".chars().count();
        assert!(half.abs_diff(chosen) <= half.abs_diff(other));
    }

    #[test]
    fn split_is_deterministic() {
        let message = "Happy Holidays from all of us to you and your family this season.";
        let a = format_message_with_line_break(message);
        let b = format_message_with_line_break(message);
        assert_eq!(a, b);
        assert_eq!(a.first_line, "Happy Holidays from all of us to");
        assert_eq!(a.second_line, "you and your family this season.");
    }

    #[test]
    fn single_long_word_stays_on_one_line() {
        let message = "Supercalifragilisticexpialidociousness!!";
        let formatted = format_message_with_line_break(message);
        assert!(!formatted.should_break);
        assert_eq!(formatted.first_line, message);
    }

    #[test]
    fn lines_rejoin_to_original() {
        let message = "Best wishes for a peaceful holiday season and a prosperous new year";
        let formatted = format_message_with_line_break(message);
        assert!(formatted.should_break);
        assert_eq!(
            format!("{} {}", formatted.first_line, formatted.second_line),
            message
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let message = "Frohe Weihnachten und ein glückliches neues Jahr für alle";
        let formatted = format_message_with_line_break(message);
        assert!(formatted.should_break);
        assert!(!formatted.first_line.is_empty());
        assert!(!formatted.second_line.is_empty());
    }
}
