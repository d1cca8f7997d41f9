use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("response body is not valid JSON")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking transport seam. Adapters and the installer only talk to the
/// network through this trait, so tests substitute canned responses.
pub trait HttpClient {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<HttpResponse>;
}

/// Issues the request and treats any non-2xx status as an error.
pub fn get_checked(
    http: &dyn HttpClient,
    url: &str,
    headers: &[(String, String)],
    query: &[(String, String)],
) -> Result<HttpResponse> {
    let response = http.get(url, headers, query)?;
    if !response.is_success() {
        return Err(anyhow!(
            "request to {url} returned status {}",
            response.status
        ));
    }
    Ok(response)
}

pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("modsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .with_context(|| format!("failed to read response body: {url}"))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
