use anyhow::{Context, Result, bail};

/// Seed used when no tokens resolve to anything.
pub const DEFAULT_SEED: u64 = 1337;

/// Split a comma-separated argument into trimmed, non-empty tokens.
#[must_use]
pub fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Resolve CLI seed tokens into a de-duplicated list, keeping first-seen order.
///
/// Accepts literal integers (negative values use their magnitude) and
/// half-open ranges written `start..end`.
///
/// # Errors
///
/// Fails on tokens that are neither integers nor valid ranges.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in tokens {
        if let Some((start, end)) = token.split_once("..") {
            let start = parse_seed(start).with_context(|| format!("bad range start in {token}"))?;
            let end = parse_seed(end).with_context(|| format!("bad range end in {token}"))?;
            if end <= start {
                bail!("empty seed range: {token}");
            }
            seeds.extend(start..end);
            continue;
        }
        seeds.push(parse_seed(token)?);
    }

    let mut seen = std::collections::HashSet::new();
    seeds.retain(|seed| seen.insert(*seed));
    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    bail!("Unrecognized seed token: {token}")
}
