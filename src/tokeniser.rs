use log::debug;

/// Push the contents of the character buffer as a token, if there is anything in it.
/// Cleans up after itself by clearing the character buffer.
fn flush_char_buf(char_buf: &mut String, tokens: &mut Vec<String>) {
    if !char_buf.is_empty() {
        tokens.push(std::mem::take(char_buf));
    }
}

/// Tokenise a program string.
///
/// Parentheses are always tokens of their own. Whitespace and comments (`;` up to the end
/// of the line) separate tokens and are dropped. Everything else accumulates into the
/// current token, so `-` glued to the following characters (`-5`, `-x`) stays part of
/// that token while a `-` followed by whitespace or a parenthesis comes out alone.
///
/// Classifying tokens as numbers or symbols is left to the parser. Unbalanced
/// parentheses are not an error here either.
pub fn tokenise(program_string: &str) -> Vec<String> {
    let mut char_buf = String::new();
    let mut tokens = Vec::new();
    let mut in_comment = false;

    for character in program_string.chars() {
        if in_comment {
            if character == '\n' {
                in_comment = false;
            }
            continue;
        }

        match character {
            ';' => {
                flush_char_buf(&mut char_buf, &mut tokens);
                in_comment = true;
            }
            '(' | ')' => {
                flush_char_buf(&mut char_buf, &mut tokens);
                tokens.push(character.to_string());
            }
            other if other.is_whitespace() => {
                flush_char_buf(&mut char_buf, &mut tokens);
            }
            other => char_buf.push(other),
        }
    }

    flush_char_buf(&mut char_buf, &mut tokens);

    debug!("tokenised {} characters into {} tokens", program_string.len(), tokens.len());
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenise_addition() {
        assert_eq!(tokenise("(+ 123 456)"), vec!["(", "+", "123", "456", ")"]);
    }

    #[test]
    fn tokenise_lone_operator() {
        assert_eq!(tokenise(" + "), vec!["+"]);
    }

    #[test]
    fn tokenise_negative_number() {
        assert_eq!(tokenise("-867.5309"), vec!["-867.5309"]);
    }

    #[test]
    fn tokenise_subtraction() {
        assert_eq!(tokenise("(- 5 3)"), vec!["(", "-", "5", "3", ")"]);
    }

    #[test]
    fn tokenise_minus_before_paren() {
        assert_eq!(tokenise("(-)"), vec!["(", "-", ")"]);
    }

    #[test]
    fn tokenise_hyphenated_symbol() {
        assert_eq!(tokenise("(bare-name -x)"), vec!["(", "bare-name", "-x", ")"]);
    }

    #[test]
    fn tokenise_comments() {
        assert_eq!(
            tokenise("((parse   these \n tokens) ;but ignore comments\n here );)"),
            vec!["(", "(", "parse", "these", "tokens", ")", "here", ")"]
        );
    }

    #[test]
    fn tokenise_semicolon_inside_comment() {
        assert_eq!(tokenise("a ; one ; two\nb"), vec!["a", "b"]);
    }

    #[test]
    fn tokenise_parens_split_glued_text() {
        assert_eq!(tokenise("(f(g)h)"), vec!["(", "f", "(", "g", ")", "h", ")"]);
    }

    #[test]
    fn tokenise_unbalanced_is_not_an_error() {
        assert_eq!(tokenise(")("), vec![")", "("]);
    }

    #[test]
    fn tokenise_empty() {
        assert!(tokenise("  \n\t; nothing here").is_empty());
    }
}
