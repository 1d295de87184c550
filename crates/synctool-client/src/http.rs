use crate::Result;

/// A fetched HTTP response, reduced to what the sync routines need.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET abstraction.
///
/// The production implementation is [`ReqwestFetcher`]; tests substitute
/// canned responses without touching the network.
pub trait HttpFetch: Send + Sync {
    /// Fetches `url`. When `token` is given it is sent as the Basic-auth
    /// username with an empty password.
    fn get(&self, url: &str, token: Option<&str>) -> Result<FetchedResponse>;
}

pub struct ReqwestFetcher {
    client: reqwest::blocking::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get(&self, url: &str, token: Option<&str>) -> Result<FetchedResponse> {
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.basic_auth(token, Some(""));
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(FetchedResponse { status, body })
    }
}
