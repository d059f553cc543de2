//! Search, filter, paging and stage behaviour over in-memory lists.

use chrono::{Duration, TimeZone, Utc};
use deal_pipeline::{
    CategoryFilter, Deal, DealDimension, DealStage, FilterCriteria, ListView, PageInfo,
    group_by_stage, run_query,
};

fn deal(id: &str, client: &str, sector: &str, kind: &str, stage: DealStage) -> Deal {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    let mut deal = Deal::new(id, client, sector, kind, created);
    deal.current_stage = stage;
    deal
}

fn numbered(n: usize) -> Vec<Deal> {
    (1..=n)
        .map(|i| deal(&i.to_string(), &format!("Client {i}"), "Tech", "M&A", DealStage::Prospect))
        .collect()
}

#[test]
fn test_case_insensitive_search_over_two_deals() {
    let deals = vec![
        deal("1", "Acme", "Tech", "M&A", DealStage::Prospect),
        deal("2", "Beta", "Finance", "IPO", DealStage::Closed),
    ];

    let result = run_query(&deals, &FilterCriteria::new().with_search("acme"), 10, 1);

    assert_eq!(result.total_count(), 1);
    assert_eq!(result.filtered.len(), 1);
    assert_eq!(result.filtered[0].client_name, "Acme");
}

#[test]
fn test_third_page_of_twenty_five() {
    let deals = numbered(25);

    let result = run_query(&deals, &FilterCriteria::new(), 10, 3);

    let ids: Vec<&str> = result.page.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["21", "22", "23", "24", "25"]);
    assert_eq!(result.info.start_index, 21);
    assert_eq!(result.info.end_index, 25);
    assert_eq!(result.info.total_pages, 3);
    assert!(!result.info.has_next());
}

#[test]
fn test_filters_combine_and_keep_input_order() {
    let deals = vec![
        deal("1", "Acme", "Tech", "M&A", DealStage::Prospect),
        deal("2", "Beta", "Tech", "IPO", DealStage::Closed),
        deal("3", "Gamma", "Tech", "M&A", DealStage::Closed),
        deal("4", "Delta", "Finance", "M&A", DealStage::Closed),
    ];
    let criteria = FilterCriteria::new()
        .with_filter(DealDimension::Sector, "Tech")
        .with_filter(DealDimension::Stage, "Closed");

    let result = run_query(&deals, &criteria, 10, 1);
    let ids: Vec<&str> = result.filtered.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);

    let all = criteria.clone().with_filter(DealDimension::Stage, "ALL");
    assert_eq!(all.filter(DealDimension::Stage), CategoryFilter::All);
    assert_eq!(run_query(&deals, &all, 10, 1).total_count(), 3);
}

#[test]
fn test_filter_codes_are_case_sensitive() {
    let deals = vec![deal("1", "Acme", "Tech", "M&A", DealStage::Prospect)];
    let criteria = FilterCriteria::new().with_filter(DealDimension::Sector, "tech");
    assert_eq!(run_query(&deals, &criteria, 10, 1).total_count(), 0);
}

#[test]
fn test_empty_list_has_zero_pages() {
    let info = PageInfo::new(0, 10, 1);
    assert_eq!(info.total_pages, 0);
    assert_eq!((info.start_index, info.end_index), (0, 0));
    assert!(!info.has_next());
    assert!(!info.has_previous());
}

#[test]
fn test_list_view_search_resets_page() {
    let mut view = ListView::new(10);
    view.set_items(numbered(25));
    assert!(view.go_to_page(3));

    view.set_search_term("client 1");
    assert_eq!(view.current_page(), 1);
    // "Client 1" and "Client 10".."Client 19"
    assert_eq!(view.total_count(), 11);
    assert_eq!(view.total_pages(), 2);
}

#[test]
fn test_stage_update_touches_only_stage_and_timestamp() {
    let mut deal = deal("1", "Acme", "Tech", "M&A", DealStage::Prospect).with_value(10);
    let before = deal.clone();
    let later = before.updated_at + Duration::hours(1);

    let previous = deal.move_to_stage(DealStage::Closed, later);

    assert_eq!(previous, DealStage::Prospect);
    assert_eq!(deal.current_stage, DealStage::Closed);
    assert_eq!(deal.updated_at, later);
    assert!(deal.notes().is_empty());
    assert_eq!(deal.client_name, before.client_name);
    assert_eq!(deal.deal_value, before.deal_value);
    assert_eq!(deal.created_at, before.created_at);
}

#[test]
fn test_every_stage_reaches_every_stage() {
    for from in DealStage::ALL {
        for to in DealStage::ALL {
            assert_eq!(from.transition_to(to), to);
        }
    }
}

#[test]
fn test_notes_append_in_order() {
    let mut deal = deal("1", "Acme", "Tech", "M&A", DealStage::Prospect);
    let t0 = deal.created_at;

    deal.append_note("u1", "first", t0).unwrap();
    deal.append_note("u2", "second", t0 + Duration::minutes(5)).unwrap();
    assert!(deal.append_note("u1", "  ", t0).is_err());

    let notes: Vec<&str> = deal.notes().iter().map(|n| n.note.as_str()).collect();
    assert_eq!(notes, vec!["first", "second"]);
    assert_eq!(deal.notes()[1].user_id, "u2");
}

#[test]
fn test_board_keeps_all_columns() {
    let deals = vec![
        deal("1", "Acme", "Tech", "M&A", DealStage::Closed),
        deal("2", "Beta", "Tech", "IPO", DealStage::Prospect),
        deal("3", "Gamma", "Tech", "M&A", DealStage::Closed),
    ];

    let board = group_by_stage(&deals);

    assert_eq!(board.len(), 5);
    assert_eq!(board[0].stage, DealStage::Prospect);
    assert_eq!(board[0].deals.len(), 1);
    assert!(board[1].deals.is_empty());
    let closed: Vec<&str> = board[3].deals.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(closed, vec!["1", "3"]);
}
