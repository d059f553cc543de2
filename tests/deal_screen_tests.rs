//! Deal list, detail and form controllers against a scripted API.

mod common;

use common::{deal_json, harness};
use deal_pipeline::{
    DealDetailScreen, DealDimension, DealFormScreen, DealListScreen, DealStage, PipelineError,
    RefreshOutcome, Role, Screen, ValidationError, handlers::FormMode,
};
use reqwest::Method;
use serde_json::json;

fn two_deals() -> serde_json::Value {
    json!([
        deal_json("d1", "Acme", "Tech", "M&A", "Prospect"),
        deal_json("d2", "Beta", "Finance", "IPO", "Closed"),
    ])
}

#[tokio::test]
async fn test_list_reload_and_search() {
    let h = harness(Some(Role::User));
    h.transport.respond_json(200, two_deals());

    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    assert_eq!(screen.reload().await, RefreshOutcome::Applied { count: 2 });
    assert_eq!(h.transport.last().path(), "/deals");

    screen.view_mut().set_search_term("acme");
    let page = screen.view().page();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].client_name, "Acme");
    assert_eq!(screen.view().total_count(), 1);

    screen.view_mut().set_search_term("");
    screen.view_mut().set_filter(DealDimension::Stage, "Closed");
    assert_eq!(screen.view().page()[0].id, "d2");
}

#[tokio::test]
async fn test_list_calls_are_counted_by_outcome() {
    let h = harness(Some(Role::User));
    h.transport.respond_json(200, two_deals());
    h.transport.respond_json(503, json!({"message": "down"}));

    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    screen.reload().await;
    screen.reload().await;

    assert_eq!(h.metrics.count("list_deals", "success"), 1);
    assert_eq!(h.metrics.count("list_deals", "http_error"), 1);
    let text = h.metrics.render().unwrap();
    assert!(text.contains("operation=\"list_deals\""));
}

#[tokio::test]
async fn test_failed_list_fetch_clears_the_list() {
    let h = harness(Some(Role::User));
    h.transport.respond_json(200, two_deals());
    h.transport.respond(500, "");

    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    screen.reload().await;
    assert_eq!(screen.view().items().len(), 2);

    assert_eq!(screen.reload().await, RefreshOutcome::Cleared);
    assert!(screen.view().items().is_empty());
}

#[test]
fn test_columns_depend_on_role() {
    let user = harness(Some(Role::User));
    let admin = harness(Some(Role::Admin));

    let user_columns = DealListScreen::open(user.ctx.clone()).unwrap().columns();
    let admin_columns = DealListScreen::open(admin.ctx.clone()).unwrap().columns();

    assert!(!user_columns.contains(&"dealValue"));
    assert!(!user_columns.contains(&"actions"));
    assert!(admin_columns.contains(&"dealValue"));
    assert!(admin_columns.contains(&"actions"));
}

#[test]
fn test_list_requires_session() {
    let h = harness(None);
    let err = DealListScreen::open(h.ctx.clone()).err().unwrap();
    assert!(matches!(err, PipelineError::AuthenticationAbsent));
    assert_eq!(h.router.current(), Screen::Login);
}

#[tokio::test]
async fn test_user_cannot_delete() {
    let h = harness(Some(Role::User));
    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    let history = h.router.history();

    let err = screen.delete("d1").await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::AuthorizationDenied { required: Role::Admin, actual: Some(Role::User) }
    ));
    assert_eq!(h.transport.request_count(), 0);
    // Refused in place, not redirected
    assert_eq!(h.router.history(), history);
}

#[tokio::test]
async fn test_admin_delete_then_reload() {
    let h = harness(Some(Role::Admin));
    h.transport.respond(204, "");
    h.transport.respond_json(200, json!([deal_json("d2", "Beta", "Finance", "IPO", "Closed")]));

    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    let outcome = screen.delete("d1").await.unwrap();

    assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });
    let requests = h.transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(requests[0].path(), "/deals/d1");
    assert_eq!(requests[1].method, Method::GET);
    assert_eq!(requests[1].path(), "/deals");
}

#[tokio::test]
async fn test_failed_delete_skips_reload() {
    let h = harness(Some(Role::Admin));
    h.transport.respond_json(200, two_deals());
    h.transport.respond_json(500, json!({"message": "boom"}));

    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    screen.reload().await;
    assert!(screen.delete("d1").await.is_err());

    assert_eq!(h.transport.request_count(), 2);
    assert_eq!(screen.view().items().len(), 2);
}

#[tokio::test]
async fn test_stage_update_from_list_replaces_record() {
    let h = harness(Some(Role::User));
    h.transport.respond_json(200, two_deals());
    h.transport
        .respond_json(200, deal_json("d1", "Acme", "Tech", "M&A", "Closed"));

    let mut screen = DealListScreen::open(h.ctx.clone()).unwrap();
    screen.reload().await;
    screen.update_stage("d1", DealStage::Closed).await.unwrap();

    let sent = h.transport.last();
    assert_eq!(sent.method, Method::PATCH);
    assert_eq!(sent.path(), "/deals/d1/stage");
    assert_eq!(sent.body, Some(json!({"stage": "Closed"})));
    assert_eq!(screen.view().items()[0].current_stage, DealStage::Closed);
}

#[tokio::test]
async fn test_detail_blank_note_sends_nothing() {
    let h = harness(Some(Role::User));
    h.transport
        .respond_json(200, deal_json("d1", "Acme", "Tech", "M&A", "Prospect"));

    let mut screen = DealDetailScreen::open(h.ctx.clone(), "d1").unwrap();
    screen.load().await.unwrap();

    assert!(!screen.add_note("   ").await.unwrap());
    assert_eq!(h.transport.request_count(), 1);
}

#[tokio::test]
async fn test_detail_add_note_appends() {
    let h = harness(Some(Role::User));
    h.transport
        .respond_json(200, deal_json("d1", "Acme", "Tech", "M&A", "Prospect"));
    let mut with_note = deal_json("d1", "Acme", "Tech", "M&A", "Prospect");
    with_note["notes"] = json!([
        {"userId": "u1", "note": "Called CFO", "timestamp": "2024-03-02T09:00:00Z"}
    ]);
    h.transport.respond_json(200, with_note);

    let mut screen = DealDetailScreen::open(h.ctx.clone(), "d1").unwrap();
    screen.load().await.unwrap();
    assert!(screen.add_note("Called CFO").await.unwrap());

    let sent = h.transport.last();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path(), "/deals/d1/notes");
    assert_eq!(sent.body, Some(json!({"note": "Called CFO"})));
    assert_eq!(screen.deal().unwrap().notes().len(), 1);
}

#[tokio::test]
async fn test_failed_stage_change_keeps_prior_deal() {
    let h = harness(Some(Role::User));
    h.transport
        .respond_json(200, deal_json("d1", "Acme", "Tech", "M&A", "Prospect"));
    h.transport.respond(503, "");

    let mut screen = DealDetailScreen::open(h.ctx.clone(), "d1").unwrap();
    screen.load().await.unwrap();
    assert!(screen.change_stage(DealStage::Lost).await.is_err());
    assert_eq!(screen.deal().unwrap().current_stage, DealStage::Prospect);
}

#[tokio::test]
async fn test_value_update_is_admin_only_and_non_negative() {
    let user = harness(Some(Role::User));
    let mut screen = DealDetailScreen::open(user.ctx.clone(), "d1").unwrap();
    let history = user.router.history();
    assert!(matches!(
        screen.update_value(100).await,
        Err(PipelineError::AuthorizationDenied { .. })
    ));
    assert_eq!(user.transport.request_count(), 0);
    assert_eq!(user.router.history(), history);

    let admin = harness(Some(Role::Admin));
    let mut screen = DealDetailScreen::open(admin.ctx.clone(), "d1").unwrap();
    assert!(matches!(
        screen.update_value(-1).await,
        Err(PipelineError::ValidationFailed(ValidationError::NegativeValue))
    ));
    assert_eq!(admin.transport.request_count(), 0);

    let mut valued = deal_json("d1", "Acme", "Tech", "M&A", "Prospect");
    valued["dealValue"] = json!(250000);
    admin.transport.respond_json(200, valued);
    let deal = screen.update_value(250000).await.unwrap();
    assert_eq!(deal.deal_value, Some(250000));

    let sent = admin.transport.last();
    assert_eq!(sent.method, Method::PATCH);
    assert_eq!(sent.path(), "/deals/d1/value");
    assert_eq!(sent.body, Some(json!({"value": 250000})));
}

#[tokio::test]
async fn test_user_create_payload_has_no_value_key() {
    let h = harness(Some(Role::User));
    h.transport
        .respond_json(201, deal_json("d9", "Gamma", "Energy", "Debt", "Prospect"));

    let mut form = DealFormScreen::open_new(h.ctx.clone()).unwrap();
    assert!(!form.has_value_field());
    form.draft.client_name = "Gamma".to_string();
    form.draft.sector = "Energy".to_string();
    form.draft.deal_type = "Debt".to_string();
    form.draft.deal_value = Some(999);

    form.submit().await.unwrap();

    let body = h.transport.last().body.unwrap();
    assert!(body.get("dealValue").is_none());
    assert_eq!(body["clientName"], "Gamma");
    assert_eq!(h.router.current(), Screen::DealList);
}

#[tokio::test]
async fn test_admin_create_payload_carries_value() {
    let h = harness(Some(Role::Admin));
    h.transport
        .respond_json(201, deal_json("d9", "Gamma", "Energy", "Debt", "Prospect"));

    let mut form = DealFormScreen::open_new(h.ctx.clone()).unwrap();
    form.draft.client_name = "Gamma".to_string();
    form.draft.sector = "Energy".to_string();
    form.draft.deal_type = "Debt".to_string();
    form.draft.deal_value = Some(5000);
    form.submit().await.unwrap();

    let sent = h.transport.last();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path(), "/deals");
    assert_eq!(sent.body.unwrap()["dealValue"], 5000);
}

#[tokio::test]
async fn test_form_missing_fields_sends_nothing() {
    let h = harness(Some(Role::Admin));
    let form = DealFormScreen::open_new(h.ctx.clone()).unwrap();

    let err = form.submit().await.unwrap_err();
    assert!(matches!(err, PipelineError::ValidationFailed(ValidationError::Required(_))));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn test_user_edit_form_drops_value() {
    let h = harness(Some(Role::User));
    let mut loaded = deal_json("d1", "Acme", "Tech", "M&A", "Prospect");
    loaded["dealValue"] = json!(42);
    h.transport.respond_json(200, loaded);
    h.transport
        .respond_json(200, deal_json("d1", "Acme Corp", "Tech", "M&A", "Prospect"));

    let mut form = DealFormScreen::open_edit(h.ctx.clone(), "d1").await.unwrap();
    assert_eq!(form.mode(), &FormMode::Edit("d1".to_string()));
    assert_eq!(form.draft.deal_value, None);
    assert_eq!(form.draft.summary, "Acme summary");

    form.draft.client_name = "Acme Corp".to_string();
    form.submit().await.unwrap();

    let sent = h.transport.last();
    assert_eq!(sent.method, Method::PUT);
    assert_eq!(sent.path(), "/deals/d1");
    assert!(sent.body.unwrap().get("dealValue").is_none());
}
