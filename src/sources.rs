//! The static source registry.
//!
//! Every source carries a fetch strategy (feed vs. page crawl) and a default
//! topic that is always assigned to its articles. The registry is defined at
//! compile time and cannot fail to load; order determines scrape order.

use crate::models::{FetchStrategy, Source};

/// All configured news sources, in scrape order.
pub const SOURCES: &[Source] = &[
    Source {
        name: "BBC",
        url: "https://www.bbc.com/news",
        strategy: FetchStrategy::PageCrawl,
        default_topic: "general",
    },
    Source {
        name: "CNN",
        url: "http://rss.cnn.com/rss/edition.rss",
        strategy: FetchStrategy::Feed,
        default_topic: "general",
    },
    Source {
        name: "Reuters",
        url: "https://www.reuters.com/",
        strategy: FetchStrategy::PageCrawl,
        default_topic: "general",
    },
    Source {
        name: "NYTimes",
        url: "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
        strategy: FetchStrategy::Feed,
        default_topic: "world",
    },
    Source {
        name: "TechCrunch",
        url: "https://techcrunch.com/feed/",
        strategy: FetchStrategy::Feed,
        default_topic: "technology",
    },
    Source {
        name: "ESPN",
        url: "https://www.espn.com/espn/rss/news",
        strategy: FetchStrategy::Feed,
        default_topic: "sports",
    },
    Source {
        name: "BBC Technology",
        url: "http://feeds.bbci.co.uk/news/technology/rss.xml",
        strategy: FetchStrategy::Feed,
        default_topic: "technology",
    },
    Source {
        name: "BBC Business",
        url: "http://feeds.bbci.co.uk/news/business/rss.xml",
        strategy: FetchStrategy::Feed,
        default_topic: "business",
    },
    Source {
        name: "BBC Health",
        url: "http://feeds.bbci.co.uk/news/health/rss.xml",
        strategy: FetchStrategy::Feed,
        default_topic: "health",
    },
    Source {
        name: "BBC Science",
        url: "http://feeds.bbci.co.uk/news/science_and_environment/rss.xml",
        strategy: FetchStrategy::Feed,
        default_topic: "science",
    },
    Source {
        name: "BBC Entertainment",
        url: "http://feeds.bbci.co.uk/news/entertainment_and_arts/rss.xml",
        strategy: FetchStrategy::Feed,
        default_topic: "entertainment",
    },
];

/// The configured sources in scrape order.
pub fn list_sources() -> &'static [Source] {
    SOURCES
}
