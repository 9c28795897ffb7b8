use planning_core::db::open_db_in_memory;
use planning_core::{
    apply_update_atomically, EntityKind, PerformerRepository, PlanningResponse,
    PlanningService, PlanningUpdateRequest, RepoError, SqlitePerformerRepository,
};
use rusqlite::Connection;
use serde_json::{json, Value};

fn setup() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO projects (id, name, created_by) VALUES (1, 'Riverside', 7);
         INSERT INTO project_knots (id, project_id) VALUES (1, 1), (2, 1);
         INSERT INTO project_knot_crosses (id, project_knot_id) VALUES (9, 1), (10, 2);
         INSERT INTO aop_oms (id, project_id) VALUES (5, 1), (6, 1);
         INSERT INTO aop_dboards (id, project_id) VALUES (3, 1);
         INSERT INTO aop_focables (id, project_id) VALUES (4, 1);",
    )
    .unwrap();
    conn
}

fn request(value: Value) -> PlanningUpdateRequest {
    serde_json::from_value(value).unwrap()
}

fn run(conn: &Connection, value: Value) -> Value {
    let repo = SqlitePerformerRepository::try_new(conn).unwrap();
    let service = PlanningService::new(repo);
    let response = service.handle_performers(&request(value)).unwrap();
    serde_json::to_value(&response).unwrap()
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn total_performer_rows(conn: &Connection) -> i64 {
    EntityKind::ALL
        .into_iter()
        .map(|kind| count_rows(conn, kind.descriptor().performer_table))
        .sum()
}

#[test]
fn empty_request_returns_empty_performers_and_writes_nothing() {
    let conn = setup();

    let response = run(&conn, json!({}));

    assert_eq!(response, json!({"status": "success", "performers": {}}));
    assert_eq!(total_performer_rows(&conn), 0);
    assert_eq!(PlanningResponse::HTTP_STATUS, 201);
}

#[test]
fn om_performer_is_created_and_returned() {
    let conn = setup();

    let response = run(
        &conn,
        json!({"aor_oms": {"update": [
            {"id": 5, "performers": {"create": [{"btu_user_login": "alice"}]}}
        ]}}),
    );

    let created = response["performers"]["aor_oms"]["update"]["performers"]["create"]
        .as_array()
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["aop_om_id"], json!(5));
    assert_eq!(created[0]["btu_user_login"], json!("alice"));

    let repo = SqlitePerformerRepository::try_new(&conn).unwrap();
    let stored = repo.list_performers(EntityKind::Om, 5).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].btu_user_login, "alice");
    assert_eq!(created[0]["id"], json!(stored[0].id));
}

#[test]
fn knot_request_recurses_into_crosses() {
    let conn = setup();

    let response = run(
        &conn,
        json!({"aor_knots": {"update": [{
            "id": 1,
            "cupboard_users": {"create": [{"btu_user_login": "bob"}]},
            "passive_optical_equipments": {"update": [
                {"id": 9, "performers": {"create": [{"btu_user_login": "carl"}]}}
            ]}
        }]}}),
    );

    let knots = &response["performers"]["aor_knots"]["update"];
    assert_eq!(knots["cupboard_users"]["create"][0]["project_knot_id"], json!(1));
    assert_eq!(knots["cupboard_users"]["create"][0]["btu_user_login"], json!("bob"));

    let crosses = &knots["passive_optical_equipments"]["update"]["performers"]["create"];
    assert_eq!(crosses.as_array().unwrap().len(), 1);
    assert_eq!(crosses[0]["project_knot_cross_id"], json!(9));
    assert_eq!(crosses[0]["btu_user_login"], json!("carl"));

    let repo = SqlitePerformerRepository::try_new(&conn).unwrap();
    let knot_performers = repo.list_performers(EntityKind::Knot, 1).unwrap();
    let cross_performers = repo.list_performers(EntityKind::Cross, 9).unwrap();
    assert_eq!(knot_performers.len(), 1);
    assert_eq!(knot_performers[0].btu_user_login, "bob");
    assert_eq!(cross_performers.len(), 1);
    assert_eq!(cross_performers[0].btu_user_login, "carl");
    assert_eq!(total_performer_rows(&conn), 2);
}

#[test]
fn entry_without_blocks_contributes_empty_update() {
    let conn = setup();

    let response = run(
        &conn,
        json!({
            "aor_knots": {"update": [{"id": 1}]},
            "aor_dboards": {"update": [{"id": 3}]}
        }),
    );

    assert_eq!(
        response["performers"],
        json!({
            "aor_knots": {"update": {}},
            "aor_dboards": {"update": {}}
        })
    );
    assert_eq!(total_performer_rows(&conn), 0);
}

#[test]
fn section_without_update_list_is_empty() {
    let conn = setup();

    let response = run(&conn, json!({"aor_focables": {}}));

    assert_eq!(response["performers"], json!({"aor_focables": {}}));
}

#[test]
fn empty_create_list_is_reported_as_empty() {
    let conn = setup();

    let response = run(
        &conn,
        json!({"aor_focables": {"update": [{"id": 4, "performers": {"create": []}}]}}),
    );

    assert_eq!(
        response["performers"]["aor_focables"]["update"]["performers"]["create"],
        json!([])
    );
    assert_eq!(total_performer_rows(&conn), 0);
}

#[test]
fn performers_keep_input_order_across_entities() {
    let conn = setup();

    let response = run(
        &conn,
        json!({"aor_oms": {"update": [
            {"id": 5, "performers": {"create": [
                {"btu_user_login": "alice"},
                {"btu_user_login": "bruno"}
            ]}},
            {"id": 6, "performers": {"create": [{"btu_user_login": "chen"}]}}
        ]}}),
    );

    let created = response["performers"]["aor_oms"]["update"]["performers"]["create"]
        .as_array()
        .unwrap();
    let pairs: Vec<(i64, &str)> = created
        .iter()
        .map(|item| {
            (
                item["aop_om_id"].as_i64().unwrap(),
                item["btu_user_login"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(pairs, vec![(5, "alice"), (5, "bruno"), (6, "chen")]);

    let ids: Vec<i64> = created.iter().map(|item| item["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn crosses_of_several_knots_are_merged() {
    let conn = setup();

    let response = run(
        &conn,
        json!({"aor_knots": {"update": [
            {"id": 1, "passive_optical_equipments": {"update": [
                {"id": 9, "performers": {"create": [{"btu_user_login": "carl"}]}}
            ]}},
            {"id": 2, "passive_optical_equipments": {"update": [
                {"id": 10, "performers": {"create": [{"btu_user_login": "dina"}]}}
            ]}}
        ]}}),
    );

    let knots = &response["performers"]["aor_knots"]["update"];
    assert!(knots.get("cupboard_users").is_none());
    let crosses = knots["passive_optical_equipments"]["update"]["performers"]["create"]
        .as_array()
        .unwrap();
    let owners: Vec<i64> = crosses
        .iter()
        .map(|item| item["project_knot_cross_id"].as_i64().unwrap())
        .collect();
    assert_eq!(owners, vec![9, 10]);
}

#[test]
fn all_sections_in_one_request() {
    let conn = setup();

    let response = run(
        &conn,
        json!({
            "aor_knots": {"update": [{"id": 1, "cupboard_users": {"create": [{"btu_user_login": "k"}]}}]},
            "aor_oms": {"update": [{"id": 5, "performers": {"create": [{"btu_user_login": "o"}]}}]},
            "aor_dboards": {"update": [{"id": 3, "performers": {"create": [{"btu_user_login": "d"}]}}]},
            "aor_focables": {"update": [{"id": 4, "performers": {"create": [{"btu_user_login": "f"}]}}]}
        }),
    );

    let performers = &response["performers"];
    assert_eq!(
        performers["aor_dboards"]["update"]["performers"]["create"][0]["aop_dboard_id"],
        json!(3)
    );
    assert_eq!(
        performers["aor_focables"]["update"]["performers"]["create"][0]["aop_focable_id"],
        json!(4)
    );
    assert_eq!(total_performer_rows(&conn), 4);
}

#[test]
fn repeating_a_request_duplicates_performers() {
    let conn = setup();
    let payload = json!({"aor_dboards": {"update": [
        {"id": 3, "performers": {"create": [{"btu_user_login": "dana"}]}}
    ]}});

    let first = run(&conn, payload.clone());
    let second = run(&conn, payload);

    let repo = SqlitePerformerRepository::try_new(&conn).unwrap();
    let stored = repo.list_performers(EntityKind::Dboard, 3).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|performer| performer.btu_user_login == "dana"));
    assert_ne!(stored[0].id, stored[1].id);

    let path = "/performers/aor_dboards/update/performers/create/0/id";
    assert_ne!(first.pointer(path), second.pointer(path));
}

#[test]
fn failed_write_aborts_and_keeps_earlier_rows() {
    let conn = setup();
    let repo = SqlitePerformerRepository::try_new(&conn).unwrap();
    let service = PlanningService::new(repo);

    let err = service
        .handle_performers(&request(json!({"aor_oms": {"update": [
            {"id": 5, "performers": {"create": [{"btu_user_login": "alice"}]}},
            {"id": 404, "performers": {"create": [{"btu_user_login": "ghost"}]}},
            {"id": 6, "performers": {"create": [{"btu_user_login": "never"}]}}
        ]}})))
        .unwrap_err();

    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(service.list_performers(EntityKind::Om, 5).unwrap().len(), 1);
    assert!(service.list_performers(EntityKind::Om, 6).unwrap().is_empty());
}

#[test]
fn atomic_update_rolls_back_the_whole_request() {
    let mut conn = setup();

    let err = apply_update_atomically(
        &mut conn,
        &request(json!({
            "aor_knots": {"update": [{"id": 1, "cupboard_users": {"create": [{"btu_user_login": "bob"}]}}]},
            "aor_oms": {"update": [{"id": 404, "performers": {"create": [{"btu_user_login": "ghost"}]}}]}
        })),
    )
    .unwrap_err();

    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(total_performer_rows(&conn), 0);
}

#[test]
fn atomic_update_commits_on_success() {
    let mut conn = setup();

    let response = apply_update_atomically(
        &mut conn,
        &request(json!({"aor_knots": {"update": [{
            "id": 1,
            "cupboard_users": {"create": [{"btu_user_login": "bob"}]},
            "passive_optical_equipments": {"update": [
                {"id": 9, "performers": {"create": [{"btu_user_login": "carl"}]}}
            ]}
        }]}})),
    )
    .unwrap();

    assert_eq!(response.performers.created_count(), 2);
    assert_eq!(total_performer_rows(&conn), 2);
}

#[test]
fn blank_login_is_rejected_before_insert() {
    let conn = setup();
    let repo = SqlitePerformerRepository::try_new(&conn).unwrap();
    let service = PlanningService::new(repo);

    let err = service
        .handle_performers(&request(json!({"aor_oms": {"update": [
            {"id": 5, "performers": {"create": [{"btu_user_login": " "}]}}
        ]}})))
        .unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(total_performer_rows(&conn), 0);
}
