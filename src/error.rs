//! Error formatting for equation parsing.
//!
//! Renders chumsky errors against the offending equation string as ariadne
//! reports, so that a corrupt persisted document points at the exact spot.

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::prelude::Simple;

use crate::parser::{Span, Token};

/// Format tokenization errors into a report string
pub fn format_lex_errors(src: &str, errors: Vec<Simple<char>>) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();
        let found = error
            .found()
            .map(|c| format!("'{}'", c))
            .unwrap_or_else(|| "end of input".to_string());

        let report = Report::build(ReportKind::Error, (), span.start)
            .with_message("bad equation string")
            .with_label(
                Label::new(span.clone())
                    .with_message(format!("unexpected {}", found))
                    .with_color(Color::Red),
            );

        if report
            .finish()
            .write(Source::from(src), &mut output)
            .is_err()
        {
            return format!("bad equation string near offset {}", span.start);
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "bad equation string".to_string())
}

/// Format grammar errors into a report string
pub fn format_syntax_errors(
    src: &str,
    errors: Vec<Simple<Token>>,
    token_spans: &[(Token, Span)],
) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();

        // The parser ran over a token stream, so spans are token indices;
        // map them back to character ranges in the source string.
        let char_span = if span.start < token_spans.len() {
            token_spans[span.start].1.clone()
        } else if let Some((_, last)) = token_spans.last() {
            last.end..last.end
        } else {
            0..0
        };

        let found = error
            .found()
            .map(|t| format!("'{}'", t))
            .unwrap_or_else(|| "end of input".to_string());

        let report = Report::build(ReportKind::Error, (), char_span.start)
            .with_message("equation does not match the rendering grammar")
            .with_label(
                Label::new(char_span.clone())
                    .with_message(format!("unexpected {}", found))
                    .with_color(Color::Red),
            );

        if report
            .finish()
            .write(Source::from(src), &mut output)
            .is_err()
        {
            return format!("syntax error near offset {}", char_span.start);
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "syntax error in equation".to_string())
}
