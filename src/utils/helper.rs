/// Abbreviate a USD amount for display: $1.2B / $3.4M / $5.6k.
pub fn abbreviate_usd(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}k", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Capitalize the first letter of a chain label for display.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_ranges() {
        assert_eq!(abbreviate_usd(950.0), "$950");
        assert_eq!(abbreviate_usd(48_500.0), "$48.5k");
        assert_eq!(abbreviate_usd(1_200_000.0), "$1.2M");
        assert_eq!(abbreviate_usd(2_000_000_000.0), "$2.0B");
    }

    #[test]
    fn capitalizes() {
        assert_eq!(capitalize("solana"), "Solana");
        assert_eq!(capitalize(""), "");
    }
}
