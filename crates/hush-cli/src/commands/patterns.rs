use hush_core::builtin_patterns;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let patterns = builtin_patterns();

    if json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
        return Ok(());
    }

    for pattern in &patterns {
        println!("{:<8} {} ({}s cycle)", pattern.id(), pattern.name(), pattern.cycle_secs());
        println!("         {}", pattern.description());
    }
    println!();
    println!("Custom patterns: pass seconds per phase, e.g. `hs breathe --pattern 4-2-6`.");
    Ok(())
}
