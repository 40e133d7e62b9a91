//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without network access.

use crate::api::Source;
use crate::Result;
use anyhow::{anyhow, bail};
use std::collections::HashMap;
use url::Url;

/// The URL used in `Mode::Testing` when no sources are configured.
pub const TEST_SOURCE_URL: &str = "https://cash-audit.test/sheet.csv";

/// What a `TestSource` answers for a given URL.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TestResponse {
    /// A successful response with this body.
    Body(String),
    /// A response with this (non-success) HTTP status.
    Status(u16),
    /// A transport failure; no response at all.
    Unreachable,
}

/// An implementation of the `Source` trait that does not use the network. URLs that have no
/// registered response get the `fallback` body when there is one, and are unreachable otherwise.
/// By default the fallback is some seeded sample data.
#[derive(Debug, Clone)]
pub struct TestSource {
    responses: HashMap<String, TestResponse>,
    fallback: Option<String>,
    requests: Vec<Url>,
}

impl TestSource {
    /// A `TestSource` that has no responses and no fallback.
    pub fn empty() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: None,
            requests: Vec::new(),
        }
    }

    /// Registers `response` for `url`.
    pub fn with(mut self, url: &Url, response: TestResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Every URL that was requested, in order.
    pub fn requests(&self) -> &[Url] {
        &self.requests
    }
}

impl Default for TestSource {
    /// Serves the seed data from this module for any URL.
    fn default() -> Self {
        Self {
            fallback: Some(SEED_DATA.to_string()),
            ..Self::empty()
        }
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    async fn get(&mut self, url: &Url) -> Result<String> {
        self.requests.push(url.clone());
        match self.responses.get(url.as_str()) {
            Some(TestResponse::Body(body)) => Ok(body.clone()),
            Some(TestResponse::Status(status)) => bail!("HTTP {status}"),
            Some(TestResponse::Unreachable) => bail!("Unable to connect to {url}"),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| anyhow!("Unable to connect to {url}")),
        }
    }
}

/// Seed reconciliation data in the layout of the published sheet.
pub(crate) const SEED_DATA: &str = r##"Data,Abertura,Sangria,Unidade,Recebido Dinheiro,Troco,Despesas Dinheiro,Total Dinheiro,Saldo Caixa,Recebido Outras,Despesas Outras,Saldo Dia Anterior,Dif Abertura x Saldo Anterior,Status Divergencia
01/10/2025,"200,00",0,Centro,"1520,40","35,00","80,00","1605,40","1605,40","3210,90","0,00",,,SEM DIA ANTERIOR
01/10/2025,"150,00","500,00",Shopping Norte,"980,00","20,00","45,50","584,50","584,50","2750,00","120,00",,,Sem dia anterior
02/10/2025,"1605,40","1000,00",Centro,"1310,00","40,00","62,30","1813,10","1813,10","2980,15","0,00","1605,40","0,00",OK
02/10/2025,"600,00",0,Shopping Norte,"870,25","15,00","30,00","1425,25","1425,25","2510,40","0,00","584,50","15,50",DIVERGENTE

03/10/2025,"1813,10","1200,00",Centro,"1402,75","38,00","95,00","1882,85","1882,85","3305,60","210,00","1813,10","0,00",ok
03/10/2025,"1425,25","800,00",Shopping Norte,"905,00","25,00","12,00","1493,25","1493,25","2698,00","0,00","1425,25","0,00",
03/10/2025,"300,00",0,"Quiosque Praia, Posto 6","410,00","10,00","0,00","700,00","700,00","890,00","0,00",,,sem dia anterior
"##;
