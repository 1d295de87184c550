use synctool_models::ModelLabel;

/// A lazily-evaluated selection of rows for one model.
///
/// Holds the model label and an optional SQL `WHERE` fragment; nothing is
/// read until the queryset is handed to [`crate::Database::query`]. The
/// filter fragment is operator-authored server code, not feed input.
#[derive(Debug, Clone)]
pub struct Queryset {
    pub model: ModelLabel,
    pub filter: Option<String>,
}

impl Queryset {
    /// Every row of the model, ordered by primary key.
    pub fn all(model: ModelLabel) -> Self {
        Self {
            model,
            filter: None,
        }
    }

    /// Restricts the queryset with a raw `WHERE` fragment.
    pub fn filter(mut self, fragment: impl Into<String>) -> Self {
        self.filter = Some(fragment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_filter() {
        let qs = Queryset::all(ModelLabel::new("blog", "post"));
        assert!(qs.filter.is_none());
    }

    #[test]
    fn test_filter_fragment_is_kept() {
        let qs = Queryset::all(ModelLabel::new("blog", "post")).filter("published = 1");
        assert_eq!(qs.filter.as_deref(), Some("published = 1"));
    }
}
