use cookiejar_core::{DisplayRecord, WatchList};

use crate::aggregator::Aggregation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRowVm {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieCardVm {
    pub label: String,
    pub value: String,
    pub desc: Option<String>,
    pub from: String,
}

pub fn watch_rows(list: &WatchList) -> Vec<WatchRowVm> {
    list.iter()
        .map(|spec| WatchRowVm {
            id: spec.id.clone(),
            name: spec.name.clone(),
            domain: spec.domain.clone(),
            desc: spec.desc.clone(),
        })
        .collect()
}

/// Cards in watch-list order, regardless of the order lookups settled in.
pub fn cookie_cards(records: &[DisplayRecord]) -> Vec<CookieCardVm> {
    let mut sorted: Vec<&DisplayRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.watch_index);
    sorted
        .into_iter()
        .map(|r| CookieCardVm {
            label: r.name.clone(),
            value: r.value.clone(),
            desc: r.desc.clone().filter(|d| !d.is_empty()),
            from: r.domain.clone(),
        })
        .collect()
}

pub fn aggregation_summary(aggregation: &Aggregation) -> String {
    let mut out = format!(
        "{} of {} watched cookies found",
        aggregation.records.len(),
        aggregation.requested
    );
    if aggregation.failed > 0 {
        out.push_str(&format!(", {} lookups failed", aggregation.failed));
    }
    if aggregation.timed_out > 0 {
        out.push_str(&format!(", {} timed out", aggregation.timed_out));
    }
    out
}
