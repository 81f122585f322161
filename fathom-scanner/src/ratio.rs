use crate::normalize::NormalizedUrl;

/// Fraction of `links` whose host is exactly `page_host`, rounded half-up to
/// two decimals. An empty link list yields `0.0`.
pub fn same_domain_ratio(links: &[NormalizedUrl], page_host: Option<&str>) -> f64 {
    let total = links.len();
    if total == 0 {
        return 0.0;
    }

    let same = links
        .iter()
        .filter(|link| page_host.is_some() && link.host_str() == page_host)
        .count();

    round_hundredths(same, total)
}

/// `numerator / denominator` to two decimals, half-up, in integer arithmetic
/// so that values like 0.125 round the same way on every platform.
fn round_hundredths(numerator: usize, denominator: usize) -> f64 {
    let hundredths = (numerator * 200 + denominator) / (denominator * 2);
    hundredths as f64 / 100.0
}
