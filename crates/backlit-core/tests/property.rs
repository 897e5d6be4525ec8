use std::panic;

use backlit_core::{
    HighlightCategory, HighlightOptions, NestedHighlighter, Token, highlight,
    highlight_with_nested,
};

const CASES: usize = 300;
const MAX_LEN: usize = 256;
// Biased toward the structural characters so directives, argument lists and
// comment/code routing are hit constantly.
const CHARSET: &[char] = &[
    '\\', '{', '}', '[', ']', ',', '=', ' ', '\n', '\t', 'a', 'b', 'c', 'o', 'd', 'e', 'm', 'n',
    't', 'x', '1', '9', '-', '_', 'é',
];

#[test]
fn tokenizer_never_panics_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x4d5a_90e1_77bc_3f02);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let result = panic::catch_unwind(|| {
            let mut out = Vec::new();
            highlight(&mut out, &source, &HighlightOptions::default());
            out
        });
        if result.is_err() {
            return Err(format!("highlight panicked for case {}: {:?}", case, source).into());
        }
    }
    Ok(())
}

#[test]
fn tokens_are_ordered_disjoint_and_in_bounds() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x1fb8_03ac_559d_e1c4);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let mut out = Vec::new();
        highlight(&mut out, &source, &HighlightOptions::default());
        if let Err(message) = check_tokens(&out, source.len()) {
            return Err(format!(
                "token check failed for case {}: {}\nSource:\n---\n{}\n---",
                case, message, source
            )
            .into());
        }
    }
    Ok(())
}

#[test]
fn tokenization_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x88aa_0f31_6c02_9d7e);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let mut first = Vec::new();
        let mut second = Vec::new();
        highlight(&mut first, &source, &HighlightOptions::default());
        highlight(&mut second, &source, &HighlightOptions::default());
        if first != second {
            return Err(format!("differing runs for case {}: {:?}", case, source).into());
        }
    }
    Ok(())
}

#[test]
fn coalescing_leaves_no_contiguous_twins() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x31c9_a4dd_72e0_1b56);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let mut out = Vec::new();
        highlight(&mut out, &source, &HighlightOptions { coalescing: true });
        for pair in out.windows(2) {
            if pair[0].category == pair[1].category && pair[0].end() == pair[1].begin {
                return Err(format!(
                    "unmerged contiguous tokens {:?} for case {}: {:?}",
                    pair, case, source
                )
                .into());
            }
        }
    }
    Ok(())
}

struct StripedNested;

impl NestedHighlighter for StripedNested {
    // Alternating one-byte tokens; exercises remap splitting and merging.
    fn highlight(&mut self, out: &mut Vec<Token>, source: &str, _options: &HighlightOptions) {
        for begin in (0..source.len()).step_by(2) {
            out.push(Token {
                begin,
                length: 1,
                category: HighlightCategory::Comment,
            });
        }
    }
}

#[test]
fn nested_highlighting_preserves_the_invariants() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x9e37_79b9_7f4a_7c15);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        let result = panic::catch_unwind(|| {
            let mut out = Vec::new();
            let mut nested = StripedNested;
            highlight_with_nested(&mut out, &source, &HighlightOptions::default(), &mut nested);
            out
        });
        let tokens = match result {
            Ok(value) => value,
            Err(_) => {
                return Err(
                    format!("nested highlight panicked for case {}: {:?}", case, source).into(),
                );
            }
        };
        if let Err(message) = check_tokens(&tokens, source.len()) {
            return Err(format!(
                "nested token check failed for case {}: {}\nSource:\n---\n{}\n---",
                case, message, source
            )
            .into());
        }
    }
    Ok(())
}

fn check_tokens(tokens: &[Token], source_len: usize) -> Result<(), String> {
    let mut previous_end = 0;
    for (idx, token) in tokens.iter().enumerate() {
        if token.length == 0 {
            return Err(format!("token[{}] has zero length", idx));
        }
        if token.end() > source_len {
            return Err(format!(
                "token[{}] {:?} out of bounds (len={})",
                idx, token, source_len
            ));
        }
        if token.begin < previous_end {
            return Err(format!(
                "token[{}] {:?} overlaps previous end {}",
                idx, token, previous_end
            ));
        }
        previous_end = token.end();
    }
    Ok(())
}

fn random_string(rng: &mut Lcg, len: usize) -> String {
    let mut out = String::new();
    for _ in 0..len {
        let idx = rng.gen_range(0, CHARSET.len());
        out.push(CHARSET[idx]);
    }
    out
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = max - min;
        let value = (self.next() >> 1) as usize;
        min + (value % span)
    }
}
