//! Test harness for running tests with stochastic variations

use edn_core::{parse_all, ParseOptions, Result, StreamParser, Value};

use crate::common::{Expected, Gen, TestCase};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub chunks: Vec<String>,
    pub expected: Expected,
    pub actual: Expected,
    pub seed: u64,
}

/// Render values for comparison
pub fn render_all(values: &[Value]) -> Vec<String> {
    values.iter().map(Value::to_string).collect()
}

/// Feed chunks one by one into a single parser, then finish it.
pub fn feed_chunks<S: AsRef<str>>(chunks: &[S], options: &ParseOptions) -> Result<Vec<Value>> {
    let mut parser = StreamParser::new(options.clone());
    let mut values = Vec::new();
    for chunk in chunks {
        values.extend(parser.feed(chunk.as_ref())?);
    }
    values.extend(parser.finish()?);
    Ok(values)
}

/// Like [`feed_chunks`] for an unclosed root: the closing `)` is fed only
/// when no container is left open, matching `parse_all`.
fn feed_document(chunks: &[&str], options: &ParseOptions) -> Result<Vec<Value>> {
    let mut parser = StreamParser::new(options.clone());
    let mut values = Vec::new();
    for chunk in chunks {
        values.extend(parser.feed(chunk)?);
    }
    if parser.depth() == 0 {
        values.extend(parser.feed(")")?);
    }
    values.extend(parser.finish()?);
    Ok(values)
}

fn outcome(result: Result<Vec<Value>>) -> Expected {
    match result {
        Ok(values) => Expected::Values(render_all(&values)),
        Err(err) => Expected::Error(format!("{:?}", err.code())),
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let options = case.options.to_parse_options();
    let actual = outcome(parse_all(&case.edn, &options));
    let expected = case.expected();

    TestResult {
        passed: actual == expected,
        chunks: vec![case.edn.clone()],
        expected,
        actual,
        seed: 0,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - Filler (separators, comments, discarded forms) before the document
/// - Filler after the document, for cases that parse
/// - Random chunk boundaries, including empty chunks
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let expected = case.expected();
    let options = case.options.to_parse_options();

    let mut input = String::from("(");
    input.push_str(&gen.filler());
    input.push_str(&case.edn);
    input.push('\n');
    if matches!(expected, Expected::Values(_)) {
        input.push_str(&gen.filler());
    }

    let chunks = gen.chunks(&input);
    let actual = outcome(feed_document(&chunks, &options));
    let chunks = chunks.into_iter().map(str::to_owned).collect();

    TestResult {
        passed: actual == expected,
        chunks,
        expected,
        actual,
        seed: gen.seed,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set EDN_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nChunks:");
        for (i, chunk) in self.chunks.iter().enumerate() {
            eprintln!("  {}: {:?}", i, chunk);
        }
        eprintln!("\nExpected: {:?}", self.expected);
        eprintln!("Actual:   {:?}", self.actual);
    }
}
