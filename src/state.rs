use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::fetch::Fetcher;

#[derive(Clone)]
pub struct State {
    pub cfg: Arc<Config>,
    pub fetcher: Fetcher,
}

impl State {
    pub fn new(cfg: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&cfg)?;
        let cfg = Arc::new(cfg);

        Ok(State { cfg, fetcher })
    }
}
