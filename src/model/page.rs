//! Page identities for the sidebar-driven navigation
//!
//! The active page slug doubles as the application's "location": navigating
//! writes the slug, and deep links (the optional CLI argument) are resolved
//! back through `from_slug`.

/// A navigable page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    DataUpload,
    DataExploration,
    PcaAnalysis,
    UmapAnalysis,
    DifferentialExpression,
    GeneExplorer,
    Heatmap,
    ChromosomeMapping,
    GeographicViz,
}

impl Page {
    pub fn all() -> Vec<Page> {
        vec![
            Page::Home,
            Page::DataUpload,
            Page::DataExploration,
            Page::PcaAnalysis,
            Page::UmapAnalysis,
            Page::DifferentialExpression,
            Page::GeneExplorer,
            Page::Heatmap,
            Page::ChromosomeMapping,
            Page::GeographicViz,
        ]
    }

    /// Stable identifier used as the location fragment
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::DataUpload => "data-upload",
            Page::DataExploration => "data-exploration",
            Page::PcaAnalysis => "pca-analysis",
            Page::UmapAnalysis => "umap-analysis",
            Page::DifferentialExpression => "differential-expression",
            Page::GeneExplorer => "gene-explorer",
            Page::Heatmap => "heatmap",
            Page::ChromosomeMapping => "chromosome-mapping",
            Page::GeographicViz => "geographic-viz",
        }
    }

    /// Resolve a location fragment back to a page, if it names one
    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::all().into_iter().find(|p| p.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::DataUpload => "Data Upload",
            Page::DataExploration => "Data Exploration",
            Page::PcaAnalysis => "PCA Analysis",
            Page::UmapAnalysis => "UMAP Analysis",
            Page::DifferentialExpression => "Differential Expression",
            Page::GeneExplorer => "Gene Explorer",
            Page::Heatmap => "Heatmap",
            Page::ChromosomeMapping => "Chromosome Mapping",
            Page::GeographicViz => "Geographic Map",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for page in Page::all() {
            assert_eq!(Page::from_slug(page.slug()), Some(page));
        }
    }

    #[test]
    fn test_unknown_slug_resolves_to_none() {
        assert_eq!(Page::from_slug("no-such-page"), None);
        assert_eq!(Page::from_slug(""), None);
        // Slugs are exact, not prefix matches
        assert_eq!(Page::from_slug("data"), None);
    }

    #[test]
    fn test_slugs_are_unique() {
        let pages = Page::all();
        for (i, a) in pages.iter().enumerate() {
            for b in pages.iter().skip(i + 1) {
                assert_ne!(a.slug(), b.slug());
            }
        }
    }
}
