use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("invalid problem header {0:?}")]
    InvalidHeader(String),
    #[error("invalid literal {0:?}")]
    InvalidLiteral(String),
}

pub struct Dimacs;

impl Dimacs {
    /// Parse a DIMACS CNF file.
    ///
    /// Lines starting with `c` are comments. The `p cnf <vars> <clauses>`
    /// header is checked for shape but only used to size the clause list;
    /// the solver derives its variables from the literals. Clauses are
    /// nonzero signed integers terminated by `0` and may span lines. A
    /// stray final `0` is not treated as an empty clause.
    pub fn parse(input: &str) -> Result<Vec<Vec<i32>>, DimacsError> {
        let mut clauses: Vec<Vec<i32>> = Vec::new();
        let mut current: Vec<i32> = Vec::new();

        for line in input.lines().map(str::trim_start) {
            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            if line.starts_with('p') {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                match tokens.as_slice() {
                    ["p", "cnf", vars, cls] => {
                        let (Ok(_), Ok(n)) = (vars.parse::<u32>(), cls.parse::<usize>()) else {
                            return Err(DimacsError::InvalidHeader(line.to_string()));
                        };
                        clauses.reserve(n);
                    }
                    _ => return Err(DimacsError::InvalidHeader(line.to_string())),
                }
                continue;
            }

            for token in line.split_whitespace() {
                let lit: i32 = token
                    .parse()
                    .map_err(|_| DimacsError::InvalidLiteral(token.to_string()))?;

                if lit == 0 {
                    clauses.push(std::mem::take(&mut current));
                } else {
                    current.push(lit);
                }
            }
        }

        if !current.is_empty() {
            // Accept an unterminated final clause.
            clauses.push(current);
        } else if clauses.last().map_or(false, Vec::is_empty) {
            clauses.pop();
        }

        Ok(clauses)
    }
}
