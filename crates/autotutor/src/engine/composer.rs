use super::enricher::{EnrichedStructure, PropertyRecord};
use super::error::EngineError;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

pub const PAGE_TEMPLATE: &str = "page.html";
pub const DESCRIPTION_TEMPLATE: &str = "youtube_description.md";

const GENERATOR: &str = concat!("chem-autotutor ", env!("CARGO_PKG_VERSION"));

/// Values shared by the page and the video description.
///
/// Every key is always present; optional facts serialize as `none` so the
/// strict environment can tell a deliberate gap from a missing variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    pub title: String,
    pub subtitle: Option<String>,
    pub input_kind: &'static str,
    pub formula: String,
    pub molecular_weight: String,
    pub exact_mass: String,
    pub du: String,
    pub heavy_atoms: u32,
    pub rings: Option<usize>,
    pub net_charge: i32,
    pub smiles: Option<String>,
    /// SDF text for the 3D viewer; `None` in formula-only mode.
    pub sdf: Option<String>,
    pub bullets: Vec<String>,
    pub generator: &'static str,
}

impl PageContext {
    pub fn for_structure(
        title: &str,
        subtitle: Option<&str>,
        input_kind: &'static str,
        structure: &EnrichedStructure,
        sdf: String,
        bullets: Vec<String>,
    ) -> Self {
        Self {
            smiles: Some(structure.display_smiles.clone()),
            sdf: Some(sdf),
            ..Self::base(title, subtitle, input_kind, &structure.properties, bullets)
        }
    }

    pub fn for_formula(
        title: &str,
        subtitle: Option<&str>,
        properties: &PropertyRecord,
        bullets: Vec<String>,
    ) -> Self {
        Self::base(title, subtitle, "formula", properties, bullets)
    }

    fn base(
        title: &str,
        subtitle: Option<&str>,
        input_kind: &'static str,
        properties: &PropertyRecord,
        bullets: Vec<String>,
    ) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
            input_kind,
            formula: properties.formula.clone(),
            molecular_weight: format!("{:.3}", properties.molecular_weight),
            exact_mass: format!("{:.4}", properties.exact_mass),
            du: format!("{:.1}", properties.degree_of_unsaturation),
            heavy_atoms: properties.heavy_atoms,
            rings: properties.rings,
            net_charge: properties.net_charge,
            smiles: None,
            sdf: None,
            bullets,
            generator: GENERATOR,
        }
    }
}

/// Renders the bundled templates.
pub struct Composer {
    env: Environment<'static>,
}

impl Composer {
    /// Loads the embedded templates into a strict environment.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] if an embedded template does not
    /// compile.
    pub fn new() -> Result<Self, EngineError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (name, source) in [
            (PAGE_TEMPLATE, include_str!("../../templates/page.html.j2")),
            (
                DESCRIPTION_TEMPLATE,
                include_str!("../../templates/youtube_description.md.j2"),
            ),
        ] {
            env.add_template(name, source)
                .map_err(|source| EngineError::Template {
                    template: name,
                    source,
                })?;
        }
        Ok(Self { env })
    }

    pub fn render_page(&self, context: &PageContext) -> Result<String, EngineError> {
        self.render(PAGE_TEMPLATE, context)
    }

    pub fn render_description(&self, context: &PageContext) -> Result<String, EngineError> {
        let mut text = self.render(DESCRIPTION_TEMPLATE, context)?;
        text.push('\n');
        Ok(text)
    }

    fn render<S: Serialize>(&self, template: &'static str, context: &S) -> Result<String, EngineError> {
        self.env
            .get_template(template)
            .and_then(|t| t.render(context))
            .map_err(|source| EngineError::Template { template, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::enricher::{EnrichOptions, enrich};
    use crate::engine::input::StructureSource;
    use std::collections::BTreeMap;

    fn formula_context() -> PageContext {
        let properties = PropertyRecord::from_formula(&"C8H12Br".parse().unwrap());
        PageContext::for_formula(
            "C8H12Br",
            None,
            &properties,
            vec!["A single molecular formula can represent many isomers.".to_string()],
        )
    }

    fn structure_context() -> PageContext {
        let structure = enrich(
            &StructureSource::Smiles("CC(=O)[O-]".to_string()),
            &EnrichOptions::default(),
        )
        .unwrap();
        PageContext::for_structure(
            "acetate <ion>",
            Some("Tutorial 01"),
            "smiles",
            &structure,
            "acetate\n  test\n\n</script>\n$$$$\n".to_string(),
            vec!["Double-bond equivalents (DU): 1.0".to_string()],
        )
    }

    #[test]
    fn structure_page_embeds_viewer_and_links_files() {
        let composer = Composer::new().unwrap();
        let html = composer.render_page(&structure_context()).unwrap();
        assert!(html.contains("3Dmol-min.js"));
        assert!(html.contains("href=\"model.sdf\""));
        assert!(html.contains("src=\"model.png\""));
        assert!(html.contains("Tutorial 01"));
        assert!(html.contains("<li>Double-bond equivalents (DU): 1.0</li>"));
        assert!(html.contains("C2H3O2-"));
        assert!(html.contains("Net charge"));
    }

    #[test]
    fn page_escapes_text_and_script_payload() {
        let composer = Composer::new().unwrap();
        let html = composer.render_page(&structure_context()).unwrap();
        assert!(html.contains("acetate &lt;ion&gt;"));
        assert!(!html.contains("<ion>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn formula_page_replaces_viewer_with_explainer() {
        let composer = Composer::new().unwrap();
        let html = composer.render_page(&formula_context()).unwrap();
        assert!(!html.contains("model.sdf"));
        assert!(!html.contains("model.png"));
        assert!(!html.contains("3Dmol"));
        assert!(html.contains("class=\"explainer\""));
        assert!(html.contains("DU = 1 + C - (H + X - N) / 2 = 2.5"));
        assert!(!html.contains("<td>Rings</td>"));
    }

    #[test]
    fn description_carries_formula_and_bullets() {
        let composer = Composer::new().unwrap();
        let context = formula_context();
        let text = composer.render_description(&context).unwrap();
        assert!(text.starts_with("# C8H12Br\n"));
        assert!(text.contains("- Formula: C8H12Br\n"));
        assert!(text.contains("- A single molecular formula can represent many isomers."));
        assert!(!text.contains("SMILES"));
        assert!(!text.contains("&lt;"));
        assert!(text.ends_with("#iupac\n"));
    }

    #[test]
    fn missing_variable_is_a_template_error() {
        let composer = Composer::new().unwrap();
        let mut partial = BTreeMap::new();
        partial.insert("title", "only a title");
        let err = composer.render(PAGE_TEMPLATE, &partial).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Template {
                template: PAGE_TEMPLATE,
                ..
            }
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let composer = Composer::new().unwrap();
        let context = structure_context();
        assert_eq!(
            composer.render_description(&context).unwrap(),
            composer.render_description(&context).unwrap()
        );
    }
}
