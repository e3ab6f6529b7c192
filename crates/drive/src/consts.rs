use regex::Regex;
use std::sync::LazyLock;

/// Characters Drive uses in file and folder ids.
const ID: &str = "([A-Za-z0-9_-]+)";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// https://drive.google.com/drive/folders/<id>?usp=sharing
regex!(FOLDER_LINK_REGEX, format!(r"/folders/{ID}").as_str());
// https://drive.google.com/file/d/<id>/view
regex!(FILE_LINK_REGEX, format!(r"/d/{ID}").as_str());
// https://drive.google.com/uc?export=download&id=<id>
regex!(ID_PARAM_REGEX, format!(r"[?&]id={ID}").as_str());
regex!(BARE_ID_REGEX, format!(r"^{ID}$").as_str());
