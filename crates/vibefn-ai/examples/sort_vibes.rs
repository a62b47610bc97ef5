//! Minimal end-to-end demo: a function with no hand-written body.
//!
//! The implementation of `sort` is synthesized by the generation backend on
//! first call and cached under `.vibefn_cache/` for subsequent runs.
//!
//! Requires `OPENAI_API_KEY` (or `VIBEFN_API_KEY`) in the environment; point
//! `endpoint` at any OpenAI-compatible gateway to use another service.

use vibefn_macros::vibefn;

#[vibefn(model = "gpt-4.1-mini", endpoint = "https://openrouter.ai/api/v1/chat/completions")]
/// Sort the list in ascending order and print the sorted list.
fn sort(a: Vec<i64>) -> Vec<i64> {
    unimplemented!()
}

fn main() {
    tracing_subscriber::fmt::init();

    let sorted = sort(vec![1, 222, 3333, 4, 45634, 1314235, 233]);
    println!("sorted: {:?}", sorted);
}
