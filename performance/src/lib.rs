use rand::prelude::Distribution;
use rand::Rng;

pub fn run_conversion(input: &str, registry: &jtex::command::Registry) -> String {
    jtex::convert(input, registry, &Default::default())
        .expect("randomly generated documents convert")
        .output
}

pub fn run_lexer(input: &str) -> usize {
    jtex::token::tokenize(input).len()
}

static RANDOM_WORDS: [&str; 16] = [
    "the", "set", "of", "all", "functions", "is", "dense", "in", "and", "so", "we", "have",
    "for", "every", "Theorem", "Proof",
];

static RANDOM_ATOMS: [&str; 12] = [
    "a", "b", "x", "y", "n", "k", "0", "1", "2", r"\pi", r"\alpha", r"\sqrt{2}",
];

static RANDOM_OPERATORS: [&str; 12] = [
    "/", "*", "^", "_", "//", " + ", " - ", " = ", " => ", " <=> ", " := ", ", ..., ",
];

pub struct Weights {
    pub word: u32,
    pub space: u32,
    pub punctuation: u32,
    pub comment: u32,
    pub inline_math: u32,
    pub block_math: u32,
    pub matrix: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            word: 200,
            space: 200,
            punctuation: 30,
            comment: 5,
            inline_math: 40,
            block_math: 3,
            matrix: 2,
        }
    }
}

/// Generates a random JTeX document with roughly `num_bytes` bytes.
///
/// Every generated document converts without errors or warnings.
pub fn generate_random_jtex_document(
    rng: &mut rand::prelude::StdRng,
    num_bytes: usize,
    line_length_bounds: (usize, usize),
    weights: &Weights,
) -> String {
    let mut result = String::with_capacity(num_bytes + line_length_bounds.1);
    result.push_str("% This JTeX document was randomly generated for benchmarking.\n");
    result.push_str("--use default, tikz\n");
    while result.len() < num_bytes {
        let line_length = if line_length_bounds.1 <= line_length_bounds.0 {
            line_length_bounds.1
        } else {
            rng.gen_range(line_length_bounds.0..line_length_bounds.1 + 1)
        };
        result.push_str(&generate_random_jtex_line(rng, line_length, weights));
    }
    result
}

pub fn generate_random_jtex_line(
    rng: &mut rand::prelude::StdRng,
    line_length: usize,
    weights: &Weights,
) -> String {
    let dist = rand::distributions::WeightedIndex::new([
        weights.word,
        weights.space,
        weights.punctuation,
        weights.comment,
        weights.inline_math,
        weights.block_math,
        weights.matrix,
    ])
    .unwrap();

    let mut result = String::with_capacity(line_length + 100);
    while result.len() < line_length {
        let temp;
        let s = match dist.sample(rng) {
            0 => RANDOM_WORDS[rng.gen_range(0..RANDOM_WORDS.len())],
            1 => " ",
            2 => match rng.gen_range(0..4) {
                0 => ".",
                1 => ",",
                2 => "!",
                _ => ":",
            },
            3 => {
                // A comment runs to the end of the line.
                result.push_str("% comment");
                break;
            }
            4 => {
                temp = format!["-- {}; ", generate_random_expression(rng, 2)];
                &temp
            }
            5 => {
                temp = format!["\n--math {};\n", generate_random_expression(rng, 3)];
                &temp
            }
            _ => {
                // Cells are single atoms, as the list operator contains commas.
                let cells: Vec<&str> = (0..4)
                    .map(|_| RANDOM_ATOMS[rng.gen_range(0..RANDOM_ATOMS.len())])
                    .collect();
                temp = format![
                    "--matrix[{}, {}; {}, {}] ",
                    cells[0], cells[1], cells[2], cells[3]
                ];
                &temp
            }
        };
        result.push_str(s);
    }
    result.push('\n');
    result
}

/// Generates a random math expression with balanced parentheses.
pub fn generate_random_expression(rng: &mut rand::prelude::StdRng, max_depth: usize) -> String {
    let num_operands = rng.gen_range(1..5);
    let mut result = String::new();
    for i in 0..num_operands {
        if i > 0 {
            result.push_str(RANDOM_OPERATORS[rng.gen_range(0..RANDOM_OPERATORS.len())]);
        }
        if max_depth > 0 && rng.gen_range(0..4) == 0 {
            result.push('(');
            result.push_str(&generate_random_expression(rng, max_depth - 1));
            result.push(')');
        } else {
            result.push_str(RANDOM_ATOMS[rng.gen_range(0..RANDOM_ATOMS.len())]);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn random_documents_convert() {
        let registry = jtex_stdlib::registry();
        for seed in 0..20 {
            let mut rng = rand::prelude::StdRng::seed_from_u64(seed);
            let input = generate_random_jtex_document(&mut rng, 5_000, (40, 100), &Default::default());
            let conversion = jtex::convert(&input, &registry, &Default::default()).unwrap();
            assert_eq!(conversion.warnings, vec![], "seed {seed}");
        }
    }

    #[test]
    fn random_documents_relex_losslessly() {
        for seed in 0..20 {
            let mut rng = rand::prelude::StdRng::seed_from_u64(seed);
            let input = generate_random_jtex_document(&mut rng, 5_000, (40, 100), &Default::default());
            let tokens = jtex::token::tokenize(&input);
            assert_eq!(jtex::token::write_tokens(&tokens), input, "seed {seed}");
        }
    }
}
