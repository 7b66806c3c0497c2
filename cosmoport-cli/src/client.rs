//! HTTP client for the Cosmoport REST API.

use cosmoport_core::{PageRequest, Ship, ShipDraft, ShipFilter};
use reqwest::{Client, Response};

use crate::CliResult;

/// Default server address when neither `--server` nor `COSMOPORT_URL` is set.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Thin wrapper over the `/rest/ships` endpoints.
pub struct ShipClient {
    client: Client,
    server_url: String,
}

/// Trim whitespace and trailing slashes from a server URL.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Turn a non-success response into an error carrying the server's message.
async fn check(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or(body);
    Err(format!("server returned {status}: {message}").into())
}

impl ShipClient {
    /// Build a client for `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("cosmoport-cli").build()?;
        Ok(Self {
            client,
            server_url: normalize_server_url(server_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/ships{path}", self.server_url)
    }

    /// Fetch one page of ships matching `filter`.
    pub async fn list(&self, filter: &ShipFilter, page: &PageRequest) -> CliResult<Vec<Ship>> {
        let response = self
            .client
            .get(self.url(""))
            .query(filter)
            .query(page)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Count ships matching `filter`.
    pub async fn count(&self, filter: &ShipFilter) -> CliResult<u64> {
        let response = self.client.get(self.url("/count")).query(filter).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Fetch a ship by identifier.
    pub async fn get(&self, id: i64) -> CliResult<Ship> {
        let response = self.client.get(self.url(&format!("/{id}"))).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Create a ship.
    pub async fn create(&self, draft: &ShipDraft) -> CliResult<Ship> {
        let response = self.client.post(self.url("")).json(draft).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Update the fields present in `draft`.
    pub async fn update(&self, id: i64, draft: &ShipDraft) -> CliResult<Ship> {
        let response = self
            .client
            .post(self.url(&format!("/{id}")))
            .json(draft)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Delete a ship.
    pub async fn delete(&self, id: i64) -> CliResult<()> {
        let response = self.client.delete(self.url(&format!("/{id}"))).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmoport_core::{ShipOrder, ShipType};
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn ship_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "planet": "Caprica",
            "shipType": "MILITARY",
            "prodDate": 33_000_000_000_000_i64,
            "isUsed": false,
            "speed": 0.5,
            "crewSize": 30,
            "rating": 1.5
        })
    }

    #[test]
    fn normalize_server_url_trims_trailing_slash() {
        let url = normalize_server_url("http://localhost:8080/").expect("url");
        assert_eq!(url, "http://localhost:8080");
    }

    #[test]
    fn normalize_server_url_rejects_empty() {
        let err = normalize_server_url("   ").unwrap_err();
        assert!(err.to_string().contains("server url"));
    }

    #[tokio::test]
    async fn list_sends_filter_and_page_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships")
                    .query_param("minSpeed", "0.5")
                    .query_param("shipType", "MILITARY")
                    .query_param("pageNumber", "1")
                    .query_param("pageSize", "5")
                    .query_param("order", "RATING");
                then.status(200).json_body(json!([ship_json(4, "Galactica")]));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let filter = ShipFilter {
            min_speed: Some(0.5),
            ship_type: Some(ShipType::Military),
            ..ShipFilter::default()
        };
        let page = PageRequest {
            page_number: 1,
            page_size: 5,
            order: ShipOrder::Rating,
        };

        let ships = client.list(&filter, &page).await.expect("list");

        mock.assert_async().await;
        assert_eq!(ships.len(), 1);
        assert_eq!(ships[0].name, "Galactica");
    }

    #[tokio::test]
    async fn count_reads_plain_number() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships/count");
                then.status(200).body("12");
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        let total = client.count(&ShipFilter::default()).await.expect("count");
        assert_eq!(total, 12);
    }

    #[tokio::test]
    async fn create_posts_draft_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/ships")
                    .json_body(json!({ "name": "Pegasus", "crewSize": 30 }));
                then.status(200).json_body(ship_json(1, "Pegasus"));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let draft = ShipDraft {
            name: Some("Pegasus".to_string()),
            crew_size: Some(30),
            ..ShipDraft::default()
        };

        let ship = client.create(&draft).await.expect("create");

        mock.assert_async().await;
        assert_eq!(ship.id, 1);
    }

    #[tokio::test]
    async fn errors_surface_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships/9");
                then.status(404)
                    .json_body(json!({ "message": "not found: Ship not found" }));
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        let err = client.get(9).await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Ship not found"));
    }

    #[tokio::test]
    async fn delete_accepts_empty_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/3");
                then.status(200);
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        client.delete(3).await.expect("delete");
        mock.assert_async().await;
    }
}
