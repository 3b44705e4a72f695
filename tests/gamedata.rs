//! Game Data lookups against a mock Blizzard API.

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::path::PathBuf;

use blizzard_journal::blizzard::ApiClient;
use blizzard_journal::config::{Blizzard, Crawler as CrawlerConfig, Guild};
use blizzard_journal::gamedata;

fn blizzard_config(server: &ServerGuard) -> Blizzard {
    Blizzard {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        region: "eu".to_string(),
        locale: "en_US".to_string(),
        api_url: Some(server.url()),
        token_url: Some(format!("{}/token", server.url())),
    }
}

fn client(server: &ServerGuard) -> (ApiClient, Blizzard) {
    let blizzard = blizzard_config(server);
    let crawler = CrawlerConfig {
        max_calls: 100,
        period_secs: 1.0,
        workers: 4,
        output_dir: PathBuf::from("data"),
    };
    (ApiClient::new(&blizzard, &crawler), blizzard)
}

async fn mock_token(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(json!({"access_token": "abc", "expires_in": 3600, "token_type": "bearer"}).to_string())
        .create_async()
        .await
}

fn mock_get(server: &mut ServerGuard, path: &str, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
}

#[tokio::test]
async fn token_price_reads_copper_value() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let _price = mock_get(
        &mut server,
        "/data/wow/token/index",
        json!({"last_updated_timestamp": 0, "price": 2_500_000_000u64}),
    )
    .create_async()
    .await;

    let (client, blizzard) = client(&server);
    let copper = gamedata::token_price(&client, &blizzard).await.expect("price");
    assert_eq!(copper, 2_500_000_000);
}

#[tokio::test]
async fn roster_filters_and_enriches_members() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;

    let _classes = mock_get(
        &mut server,
        "/data/wow/playable-class/index",
        json!({"classes": [{"id": 1, "name": "Warrior"}]}),
    )
    .create_async()
    .await;
    let _class_media = mock_get(
        &mut server,
        "/data/wow/media/playable-class/1",
        json!({"assets": [{"key": "class-icon", "value": "https://cdn.invalid/warrior.png"}]}),
    )
    .create_async()
    .await;
    let _races = mock_get(
        &mut server,
        "/data/wow/playable-race/index",
        json!({"races": [{"id": 2, "name": "Orc"}]}),
    )
    .create_async()
    .await;

    let _roster = mock_get(
        &mut server,
        "/data/wow/guild/argent-dawn/the-errant-vanguard/roster",
        json!({"members": [
            {
                "rank": 0,
                "character": {
                    "id": 7001,
                    "name": "Gromsha",
                    "level": 80,
                    "realm": {"slug": "argent-dawn"},
                    "playable_class": {"id": 1},
                    "playable_race": {"id": 2},
                    "faction": {"type": "HORDE"}
                }
            },
            {
                "rank": 5,
                "character": {"id": 7002, "name": "Lowbie", "level": 12}
            }
        ]}),
    )
    .create_async()
    .await;

    let (client, blizzard) = client(&server);
    let guild = Guild {
        realm_slug: "argent-dawn".to_string(),
        name_slug: "the-errant-vanguard".to_string(),
        level_cap: 80,
    };

    let roster = gamedata::guild_roster(&client, &blizzard, &guild)
        .await
        .expect("roster");

    assert_eq!(roster.len(), 1);
    let member = &roster[0];
    assert_eq!(member.name.as_deref(), Some("Gromsha"));
    assert_eq!(member.class_name, "Warrior");
    assert_eq!(member.race, "Orc");
    assert_eq!(member.faction.as_deref(), Some("HORDE"));
    assert_eq!(member.rank, Some(0));
}

#[tokio::test]
async fn classes_index_attaches_icons() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;

    let _classes = mock_get(
        &mut server,
        "/data/wow/playable-class/index",
        json!({"classes": [{"id": 1, "name": "Warrior"}, {"id": 2, "name": "Paladin"}]}),
    )
    .create_async()
    .await;
    let _warrior_media = mock_get(
        &mut server,
        "/data/wow/media/playable-class/1",
        json!({"assets": [{"key": "class-icon", "value": "https://cdn.invalid/warrior.png"}]}),
    )
    .create_async()
    .await;
    let _paladin_media = server
        .mock("GET", "/data/wow/media/playable-class/2")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let (client, blizzard) = client(&server);
    let classes = gamedata::classes_index(&client, &blizzard).await.expect("classes");

    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].icon.as_deref(), Some("https://cdn.invalid/warrior.png"));
    assert!(classes[1].icon.is_none());
}
