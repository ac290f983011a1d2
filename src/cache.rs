//! Cache Invalidation Notifier
//!
//! After a successful write, the front-end cache must drop its entry for
//! the item and its topic. The calls are fire-and-forget: the notification
//! runs on a spawned task and a failure is logged, never surfaced.

use std::time::Duration;

pub struct CacheNotifier {
    front_end_address: Option<String>,
    client: reqwest::Client,
}

impl CacheNotifier {
    /// `None` disables notifications entirely (no front-end cache deployed).
    pub fn new(front_end_address: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("http client construction");
        Self {
            front_end_address,
            client,
        }
    }

    pub fn invalidate_item(&self, id: u32) {
        self.fire(format!("invalidate/item/{}", id));
    }

    pub fn invalidate_topic(&self, topic: &str) {
        self.fire(format!("invalidate/topic/{}", topic));
    }

    fn fire(&self, path: String) {
        let Some(front_end) = &self.front_end_address else {
            return;
        };
        let url = format!("{}/{}", front_end.trim_end_matches('/'), path);
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(error) = client.delete(url.as_str()).send().await {
                tracing::debug!(%url, %error, "cache invalidation failed");
            }
        });
    }
}
