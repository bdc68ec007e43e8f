//! Employer-name normalization and the company → sponsor linking pass.

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::store::JobStore;

/// Stripped in order, each at most once.
const CORPORATE_SUFFIXES: &[&str] = &[
    ", inc", ", llc", ", ltd", "inc.", " inc", " llc", " ltd", " corp.", " corp", " co.",
];

/// Lower-cases, strips trailing corporate suffixes, and drops `,` `.` `'`.
/// "Stripe, Inc." and "stripe" normalize to the same key.
pub fn normalize_name(name: &str) -> String {
    let mut name = name.trim().to_lowercase();
    for suffix in CORPORATE_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
        }
    }
    name.retain(|c| !matches!(c, ',' | '.' | '\''));
    name.trim().to_string()
}

/// Links every tracked company whose normalized name matches a sponsor
/// record. Returns the number of companies linked; per-company failures are
/// logged and skipped.
pub async fn link_companies(store: &dyn JobStore) -> Result<usize, AppError> {
    let companies = store.list_companies().await?;
    let mut linked = 0;

    for company in &companies {
        let key = normalize_name(&company.name);
        let sponsor = match store.find_sponsor_by_normalized_name(&key).await {
            Ok(Some(sponsor)) => sponsor,
            Ok(None) => {
                debug!("No sponsor record for '{}' (key '{key}')", company.name);
                continue;
            }
            Err(e) => {
                warn!("Sponsor lookup failed for '{}': {e}", company.name);
                continue;
            }
        };
        if let Err(e) = store.link_company_to_sponsor(company.id, &sponsor).await {
            warn!("Failed to link '{}' to sponsor: {e}", company.name);
            continue;
        }
        linked += 1;
    }

    info!("Linked {linked} of {} companies to sponsor records", companies.len());
    Ok(linked)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::company::{Company, NewCompany};
    use crate::models::sponsor::Sponsor;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_normalize_strips_suffixes_and_punctuation() {
        assert_eq!(normalize_name("Stripe, Inc."), "stripe");
        assert_eq!(normalize_name("  Acme LLC "), "acme");
        assert_eq!(normalize_name("Widgets Corp."), "widgets");
        assert_eq!(normalize_name("Macy's Co."), "macys");
        assert_eq!(normalize_name("Foo Ltd"), "foo");
        assert_eq!(normalize_name("Datadog"), "datadog");
    }

    #[test]
    fn test_normalize_is_stable() {
        for name in ["Stripe, Inc.", "Acme LLC", "Macy's Co."] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    fn company(name: &str) -> Company {
        Company::new(NewCompany {
            name: name.to_string(),
            platform: "greenhouse".to_string(),
            slug: name.to_lowercase().replace(' ', ""),
            career_url: None,
        })
    }

    fn sponsor(name: &str, rate: f64, petitions: i32) -> Sponsor {
        Sponsor {
            id: Uuid::new_v4(),
            company_name: name.to_string(),
            normalized_name: normalize_name(name),
            fiscal_year: Some(2024),
            approval_rate: rate,
            total_petitions: petitions,
        }
    }

    #[tokio::test]
    async fn test_link_companies_matches_normalized_names() {
        let store = MemoryStore::default();
        let stripe = company("Stripe");
        let unknown = company("Tiny Startup");
        store.create_company(&stripe).await.unwrap();
        store.create_company(&unknown).await.unwrap();
        store
            .upsert_sponsor(&sponsor("STRIPE, INC.", 97.5, 420))
            .await
            .unwrap();

        let linked = link_companies(&store).await.unwrap();
        assert_eq!(linked, 1);

        let stripe = store.get_company(stripe.id).await.unwrap();
        assert!(stripe.sponsors_h1b);
        assert_eq!(stripe.h1b_approval_rate, Some(97.5));
        assert_eq!(stripe.h1b_total_filed, Some(420));

        let unknown = store.get_company(unknown.id).await.unwrap();
        assert!(!unknown.sponsors_h1b);
    }
}
