//! Round trips against the real catalog endpoints.
//!
//! Ignored by default; run with `cargo test -- --ignored` when network
//! access is available.

use refsolve_core::{Resolver, ResolverOptions};

#[tokio::test]
#[ignore]
async fn live_crossref_lookup() {
    let resolver = Resolver::new(ResolverOptions::default()).unwrap();
    let record = resolver
        .resolve("https://doi.org/10.1093/ajae/aaq063")
        .await
        .unwrap();

    assert_eq!(record.identifier, "10.1093/ajae/aaq063");
    assert_eq!(record.ref_type, "doi");
    assert!(record.has_publication);
    assert_eq!(record.authors[0].family, "Shi");
    assert_eq!(
        record.journal_full_title,
        "American Journal of Agricultural Economics"
    );
}

#[tokio::test]
#[ignore]
async fn live_arxiv_lookup() {
    let resolver = Resolver::new(ResolverOptions::default()).unwrap();
    let record = resolver.resolve("arXiv:hep-th/9901001v3").await.unwrap();

    assert_eq!(record.identifier, "hep-th/9901001v3");
    assert_eq!(record.ref_type, "arxiv");
    assert!(!record.has_publication);
    assert_eq!(record.authors[0].family, "Imamura");
    assert_eq!(record.online_year, "1999");
}
