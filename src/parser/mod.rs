//! Text parsers for example tables and operator prior files
//!
//! Example tables come in pairs of files: a types file with one line of
//! `Int`/`Array` tokens per problem, and a values file with one line per
//! example, columns separated by `|`. Prior files are whitespace-separated
//! `probability name` pairs.

use std::collections::HashMap;
use std::fmt;

use crate::ir::types::{Value, ValueType};

/// Column separator in values files
pub const COLUMN_SEPARATOR: &str = "|";

/// Parse error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    pub source_name: Option<String>,
    pub line_number: usize,
    pub column: Option<usize>,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            source_name: None,
            line_number,
            column: None,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "{}: ", name)?;
        }
        if let Some(col) = self.column {
            write!(
                f,
                "line {}, column {}: {}\n  | {}\n  | {}^",
                self.line_number,
                col,
                self.message,
                self.line_content,
                " ".repeat(col.saturating_sub(1))
            )
        } else {
            write!(
                f,
                "line {}: {}\n  | {}",
                self.line_number, self.message, self.line_content
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// 1-based column of `token` inside `line`, for caret rendering
fn column_of(line: &str, token: &str) -> usize {
    let base = line.as_ptr() as usize;
    let offset = (token.as_ptr() as usize).saturating_sub(base);
    offset.min(line.len()) + 1
}

/// Parse one types line, e.g. `Array Int`
pub fn parse_types_line(line: &str, line_number: usize) -> Result<Vec<ValueType>, ParseError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<ValueType>().map_err(|msg| {
                ParseError::new(line_number, msg, line).with_column(column_of(line, token))
            })
        })
        .collect()
}

/// Parse an integer element (decimal, optional sign)
pub fn parse_integer(token: &str) -> Result<i32, String> {
    token
        .parse::<i32>()
        .map_err(|_| format!("invalid integer '{}'", token))
}

/// Parse one values line against the column types, e.g. `1 2 3 | 4`
pub fn parse_values_line(
    line: &str,
    line_number: usize,
    types: &[ValueType],
) -> Result<Vec<Value>, ParseError> {
    let mut columns: Vec<Vec<i32>> = vec![Vec::new()];
    for token in line.split_whitespace() {
        if token == COLUMN_SEPARATOR {
            columns.push(Vec::new());
            continue;
        }
        let value = parse_integer(token).map_err(|msg| {
            ParseError::new(line_number, msg, line).with_column(column_of(line, token))
        })?;
        if let Some(column) = columns.last_mut() {
            column.push(value);
        }
    }

    if columns.len() != types.len() {
        return Err(ParseError::new(
            line_number,
            format!(
                "expected {} column(s) from types, found {}",
                types.len(),
                columns.len()
            ),
            line,
        ));
    }

    columns
        .into_iter()
        .zip(types)
        .enumerate()
        .map(|(i, (column, ty))| match ty {
            ValueType::Array => Ok(Value::array(column)),
            ValueType::Int => match column.as_slice() {
                [v] => Ok(Value::int(*v)),
                _ => Err(ParseError::new(
                    line_number,
                    format!(
                        "column {} is Int but holds {} value(s)",
                        i,
                        column.len()
                    ),
                    line,
                )),
            },
        })
        .collect()
}

/// Select the types line of one problem (0-based index)
pub fn parse_problem_types(content: &str, problem_idx: usize) -> Result<Vec<ValueType>, ParseError> {
    let line = content.lines().nth(problem_idx).ok_or_else(|| {
        ParseError::new(
            problem_idx.saturating_add(1),
            format!("no types line for problem {}", problem_idx),
            "",
        )
    })?;
    parse_types_line(line, problem_idx + 1)
}

/// Select and parse the `num_examples` value rows of one problem
pub fn parse_problem_values(
    content: &str,
    problem_idx: usize,
    num_examples: usize,
    types: &[ValueType],
) -> Result<Vec<Vec<Value>>, ParseError> {
    let first = problem_idx.checked_mul(num_examples).ok_or_else(|| {
        ParseError::new(
            0,
            format!(
                "problem {} with {} examples is past any line",
                problem_idx, num_examples
            ),
            "",
        )
    })?;
    let mut lines = content.lines().skip(first);

    (0..num_examples)
        .map(|j| {
            let line_number = first.saturating_add(j + 1);
            let line = lines.next().ok_or_else(|| {
                ParseError::new(
                    line_number,
                    format!("missing example {} of problem {}", j, problem_idx),
                    "",
                )
            })?;
            parse_values_line(line, line_number, types)
        })
        .collect()
}

/// Parse a prior file into a component -> probability map.
///
/// The first occurrence of a component wins.
pub fn parse_prior_string(content: &str) -> Result<HashMap<String, f64>, ParseError> {
    let mut priors = HashMap::new();
    let mut pending: Option<f64> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;
        for token in line.split_whitespace() {
            match pending.take() {
                None => {
                    let prob = token.parse::<f64>().map_err(|_| {
                        ParseError::new(line_number, format!("invalid probability '{}'", token), line)
                            .with_column(column_of(line, token))
                    })?;
                    if !(0.0..=1.0).contains(&prob) {
                        return Err(ParseError::new(
                            line_number,
                            format!("probability {} outside [0, 1]", prob),
                            line,
                        )
                        .with_column(column_of(line, token)));
                    }
                    pending = Some(prob);
                }
                Some(prob) => {
                    priors.entry(token.to_string()).or_insert(prob);
                }
            }
        }
    }

    if let Some(prob) = pending {
        let line_count = content.lines().count();
        return Err(ParseError::new(
            line_count,
            format!("probability {} without a component name", prob),
            content.lines().last().unwrap_or(""),
        ));
    }

    Ok(priors)
}
