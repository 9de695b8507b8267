//! Call descriptors: the static description of each supported call shape.

use std::fmt;

use ftapi_shared::{API_ITEM_PATH, API_KEY, Config, PAGE_MAIN_CONTENT, PAGE_PATH};
use serde::Serialize;

use crate::paths;

/// How a call turns configuration (and maybe an id) into a path.
#[derive(Clone, Copy)]
pub enum PathShape {
    /// One request per id.
    Item(fn(&Config, &str) -> String),
    /// A single request with no id.
    Collection(fn(&Config) -> String),
}

/// Static pairing of relevant configuration keys and a path builder.
pub struct CallDescriptor {
    /// Event / log name of the call.
    pub name: &'static str,
    /// Configuration keys the path builder reads.
    pub keys: &'static [&'static str],
    pub shape: PathShape,
}

impl CallDescriptor {
    /// Relevant keys that `config` does not define.
    pub fn missing_keys(&self, config: &Config) -> Vec<&'static str> {
        self.keys
            .iter()
            .copied()
            .filter(|key| !config.contains_key(key))
            .collect()
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape, PathShape::Collection(_))
    }
}

impl fmt::Debug for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallDescriptor")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("collection", &self.is_collection())
            .finish()
    }
}

static GET_CONTENT: CallDescriptor = CallDescriptor {
    name: "getApiContent",
    keys: &[API_ITEM_PATH, API_KEY],
    shape: PathShape::Item(paths::build_item_path),
};

static GET_PAGE: CallDescriptor = CallDescriptor {
    name: "getPage",
    keys: &[PAGE_PATH, API_KEY],
    shape: PathShape::Item(paths::build_page_path),
};

static GET_PAGE_CONTENT: CallDescriptor = CallDescriptor {
    name: "getPageMainContent",
    keys: &[PAGE_PATH, PAGE_MAIN_CONTENT, API_KEY],
    shape: PathShape::Item(paths::build_page_content_path),
};

static GET_PAGES: CallDescriptor = CallDescriptor {
    name: "getPages",
    keys: &[PAGE_PATH, API_KEY],
    shape: PathShape::Collection(paths::build_collection_path),
};

/// The four supported call shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CallKind {
    ApiContent,
    Page,
    PageMainContent,
    Pages,
}

impl CallKind {
    pub const ALL: [CallKind; 4] = [
        CallKind::ApiContent,
        CallKind::Page,
        CallKind::PageMainContent,
        CallKind::Pages,
    ];

    pub fn descriptor(self) -> &'static CallDescriptor {
        match self {
            Self::ApiContent => &GET_CONTENT,
            Self::Page => &GET_PAGE,
            Self::PageMainContent => &GET_PAGE_CONTENT,
            Self::Pages => &GET_PAGES,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}
