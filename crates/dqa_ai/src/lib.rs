pub mod answer;
pub mod chunking;
pub mod config;
pub mod context;
pub mod guardrails;
pub mod llm;
pub mod retrieve;

#[cfg(test)]
mod tests {
    use super::answer::prompts::build_prompt;
    use super::chunking::chunk_text;
    use super::context::assemble_context;
    use super::retrieve::rank;

    #[test]
    fn retrieval_to_prompt_is_deterministic() {
        let text = "The sky is blue because of Rayleigh scattering.\n\nCats are mammals.";
        let run = || {
            let chunks = chunk_text(text);
            let ranking = rank("why is the sky blue", &chunks).expect("rank");
            build_prompt("why is the sky blue", &assemble_context(&ranking.chunks), &[])
                .expect("prompt")
        };
        assert_eq!(run(), run());
    }
}
