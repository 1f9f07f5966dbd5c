use anyhow::Result;

use mnema::config::MnemaConfig;

/// Run a similarity search from the terminal.
pub async fn search(
    config: &MnemaConfig,
    query: &str,
    limit: Option<usize>,
    min_similarity: Option<f32>,
) -> Result<()> {
    let manager = super::open_manager(config)?;

    let limit = limit.unwrap_or(config.retrieval.default_limit);
    let min_similarity = min_similarity.unwrap_or(config.retrieval.min_similarity);

    let results = manager.find_similar(query, limit, min_similarity).await?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());
    for (i, result) in results.iter().enumerate() {
        println!(
            "  {}. [{}] {} (similarity: {:.4}, confidence: {:.2})",
            i + 1,
            result.memory.kind,
            result.memory.id,
            result.similarity,
            result.memory.confidence,
        );
        println!("     {}", super::preview(&result.memory.content, 120));
        println!();
    }

    Ok(())
}
