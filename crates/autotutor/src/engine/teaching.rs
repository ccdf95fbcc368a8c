//! Heuristic teaching bullets derived from an IUPAC name.
//!
//! The rules look at name fragments only; they never consult the structure,
//! so a bullet can be missing but never contradicts the name.

/// Chain roots in order of carbon count.
const CHAIN_ROOTS: [(&str, u32); 10] = [
    ("meth", 1),
    ("eth", 2),
    ("prop", 3),
    ("but", 4),
    ("pent", 5),
    ("hex", 6),
    ("hept", 7),
    ("oct", 8),
    ("non", 9),
    ("dec", 10),
];

/// Substituent prefixes and how they read in a bullet. Longer prefixes that
/// contain a shorter one come first so the shorter one is not double counted.
const SUBSTITUENTS: [(&str, &str); 17] = [
    ("tert-butyl", "tert-butyl (-C(CH₃)₃)"),
    ("isopropyl", "isopropyl (-CH(CH₃)₂)"),
    ("methoxy", "methoxy (-OCH₃)"),
    ("methyl", "methyl (-CH₃)"),
    ("ethyl", "ethyl (-CH₂CH₃)"),
    ("propyl", "propyl (-CH₂CH₂CH₃)"),
    ("butyl", "butyl (-C₄H₉)"),
    ("vinyl", "vinyl (-CH=CH₂)"),
    ("phenyl", "phenyl (-C₆H₅)"),
    ("fluoro", "fluorine"),
    ("chloro", "chlorine"),
    ("bromo", "bromine"),
    ("iodo", "iodine"),
    ("hydroxy", "hydroxy (-OH)"),
    ("amino", "amino (-NH₂)"),
    ("nitro", "nitro (-NO₂)"),
    ("cyano", "cyano (-C≡N)"),
];

const MULTIPLIERS: [(&str, &str); 3] = [("tetra", "four"), ("tri", "three"), ("di", "two")];

/// Name endings that identify the principal functional group.
const SUFFIXES: [(&str, &str); 8] = [
    ("oic acid", "The suffix -oic acid marks a carboxylic acid (-COOH)."),
    ("oate", "The suffix -oate marks an ester (-COOR)."),
    ("nitrile", "The suffix -nitrile marks a nitrile (-C≡N)."),
    ("amide", "The suffix -amide marks an amide (-CONH₂)."),
    ("amine", "The suffix -amine marks an amine (-NH₂)."),
    ("one", "The suffix -one marks a ketone (C=O inside the chain)."),
    ("al", "The suffix -al marks an aldehyde (-CHO at a chain end)."),
    ("ol", "The suffix -ol marks an alcohol (-OH)."),
];

/// Bullets for formula-only runs, where no structure is known.
pub const FORMULA_BULLETS: [&str; 3] = [
    "A single molecular formula can represent many isomers.",
    "Use degree of unsaturation (DU) to infer rings/double/triple bonds.",
    "Provide IUPAC name or SMILES to render a unique 3D structure.",
];

/// Derives teaching bullets from an IUPAC name.
pub fn bullets_from_name(name: &str) -> Vec<String> {
    let lower = name.trim().to_lowercase();
    if lower.is_empty() {
        return Vec::new();
    }
    let words = alphabetic_runs(&lower);
    let mut bullets = Vec::new();

    if lower.contains("cyclo") {
        bullets.push("The cyclo- prefix means the parent chain is closed into a ring.".to_string());
    }
    if lower.contains("benzen") || lower.contains("phenyl") {
        bullets.push("Contains a benzene ring (aromatic, six carbons).".to_string());
    }
    for (root, carbons) in CHAIN_ROOTS {
        if contains_root(&lower, root) {
            let unit = if carbons == 1 { "carbon" } else { "carbons" };
            bullets.push(format!("Parent chain includes: {}- ({} {}).", root, carbons, unit));
        }
    }
    if words.iter().any(|w| marks_unsaturation(w, "en")) {
        bullets.push("Contains a C=C double bond (-en-).".to_string());
    }
    if words.iter().any(|w| marks_unsaturation(w, "yn")) {
        bullets.push("Contains a C≡C triple bond (-yn-).".to_string());
    }

    let mut remaining = lower.clone();
    for (prefix, description) in SUBSTITUENTS {
        let mut total = 0;
        while let Some(pos) = remaining.find(prefix) {
            total += multiplier_before(&remaining[..pos]);
            remaining.replace_range(pos..pos + prefix.len(), &" ".repeat(prefix.len()));
        }
        match total {
            0 => {}
            1 => bullets.push(format!("Has {} {} substituent.", article(description), description)),
            n => bullets.push(format!("Has {} {} substituents.", count_word(n), description)),
        }
    }

    if let Some(text) = functional_suffix(&lower, &words) {
        bullets.push(text.to_string());
    }
    bullets
}

/// The closing bullet every structure run gets.
pub fn unsaturation_bullet(du: f64) -> String {
    format!("Double-bond equivalents (DU): {:.1}", du)
}

fn alphabetic_runs(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect()
}

/// `eth` inside `methyl` or `meth` does not count as an ethyl root.
fn contains_root(name: &str, root: &str) -> bool {
    name.match_indices(root).any(|(pos, _)| {
        let before = &name[..pos];
        !(root == "eth" && before.ends_with('m'))
            && !(root == "non" && before.ends_with('a'))
    })
}

/// Matches `en`, `ene`, `diene`, `hexene`, `ethenyl` style fragments (or the
/// `yn` equivalents) without treating `benzene` as an alkene.
fn marks_unsaturation(word: &str, infix: &str) -> bool {
    let word = word.replace("phenyl", " ").replace("benzene", " ");
    let bare = word
        .trim_start_matches("di")
        .trim_start_matches("tri")
        .trim_start_matches("tetra");
    let ending = format!("{}e", infix);
    bare == infix
        || bare == ending
        || (word.trim_end().ends_with(&ending) && word.trim_end().len() > ending.len())
        || word.contains(&format!("{}yl", infix))
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn multiplier_before(prefix_text: &str) -> u32 {
    for (word, _) in MULTIPLIERS {
        if prefix_text.ends_with(word) {
            return match word {
                "di" => 2,
                "tri" => 3,
                _ => 4,
            };
        }
    }
    1
}

fn count_word(n: u32) -> String {
    MULTIPLIERS
        .iter()
        .zip([4, 3, 2])
        .find(|(_, k)| *k == n)
        .map(|((_, word), _)| word.to_string())
        .unwrap_or_else(|| n.to_string())
}

fn functional_suffix(lower: &str, words: &[&str]) -> Option<&'static str> {
    let last = words.last()?;
    SUFFIXES.iter().find_map(|&(suffix, text)| {
        let hit = if suffix.contains(' ') {
            lower.contains(suffix)
        } else {
            last.ends_with(suffix) && !(suffix == "al" && last.ends_with("yl"))
        };
        hit.then_some(text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enyne_bromide_gets_chain_unsaturation_and_substituents() {
        let bullets = bullets_from_name("4-bromo-3-methylhept-1-en-6-yne");
        assert_eq!(
            bullets,
            vec![
                "Parent chain includes: meth- (1 carbon).",
                "Parent chain includes: hept- (7 carbons).",
                "Contains a C=C double bond (-en-).",
                "Contains a C≡C triple bond (-yn-).",
                "Has a methyl (-CH₃) substituent.",
                "Has a bromine substituent.",
            ]
        );
    }

    #[test]
    fn saturated_names_do_not_claim_double_bonds() {
        let bullets = bullets_from_name("pentane");
        assert!(bullets.iter().all(|b| !b.contains("double")));
        assert!(bullets.contains(&"Parent chain includes: pent- (5 carbons).".to_string()));
    }

    #[test]
    fn methyl_is_not_an_ethyl_root() {
        let bullets = bullets_from_name("2-methylpropane");
        assert!(!bullets.iter().any(|b| b.contains("eth- (2")));
        assert!(!bullets.iter().any(|b| b.contains("ethyl (-CH₂CH₃)")));
    }

    #[test]
    fn multipliers_are_counted() {
        let bullets = bullets_from_name("2,2-dimethylbutane");
        assert!(bullets.contains(&"Has two methyl (-CH₃) substituents.".to_string()));
        let bullets = bullets_from_name("1,1,1-trichloroethane");
        assert!(bullets.contains(&"Has three chlorine substituents.".to_string()));
    }

    #[test]
    fn functional_suffixes_are_recognized() {
        let first_suffix = |name: &str| {
            bullets_from_name(name)
                .into_iter()
                .find(|b| b.starts_with("The suffix"))
        };
        assert!(first_suffix("propan-2-ol").unwrap().contains("alcohol"));
        assert!(first_suffix("propan-2-one").unwrap().contains("ketone"));
        assert!(first_suffix("ethanal").unwrap().contains("aldehyde"));
        assert!(first_suffix("ethanoic acid").unwrap().contains("carboxylic"));
        assert!(first_suffix("ethanamine").unwrap().contains("amine"));
        assert_eq!(first_suffix("ethylbenzene"), None);
        assert_eq!(first_suffix("2-methylpropane"), None);
    }

    #[test]
    fn rings_and_aromatics() {
        let bullets = bullets_from_name("cyclohexene");
        assert!(bullets[0].contains("ring"));
        assert!(bullets.iter().any(|b| b.contains("double bond")));

        let bullets = bullets_from_name("2-phenylpropene");
        assert!(bullets.iter().any(|b| b.contains("double bond")));

        let bullets = bullets_from_name("ethylbenzene");
        assert!(bullets.iter().any(|b| b.contains("benzene ring")));
        assert!(bullets.contains(&"Has an ethyl (-CH₂CH₃) substituent.".to_string()));
        assert!(bullets.iter().all(|b| !b.contains("double bond")));
    }

    #[test]
    fn empty_name_and_du_bullet() {
        assert!(bullets_from_name("  ").is_empty());
        assert_eq!(unsaturation_bullet(3.0), "Double-bond equivalents (DU): 3.0");
        assert_eq!(unsaturation_bullet(2.5), "Double-bond equivalents (DU): 2.5");
    }
}
