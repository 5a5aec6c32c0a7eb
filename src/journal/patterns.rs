use super::JournalFamily;

/// Detection signals for one publisher family.
///
/// Markers are matched as literal, case-sensitive substrings. A marker that is
/// present counts once no matter how often it occurs.
#[derive(Debug)]
pub struct JournalPatternSet {
    pub family: JournalFamily,
    /// Label written into `DetectionResult::document_class` on a class match.
    pub canonical_class: &'static str,
    pub document_class_names: &'static [&'static str],
    pub document_class_weight: u32,
    pub command_weights: &'static [(&'static str, u32)],
}

impl JournalPatternSet {
    pub fn accepts_class(&self, class_name: &str) -> bool {
        self.document_class_names.contains(&class_name)
    }

    /// Weight configured for a marker, if the marker belongs to this family.
    pub fn command_weight(&self, marker: &str) -> Option<u32> {
        self.command_weights
            .iter()
            .find(|(m, _)| *m == marker)
            .map(|(_, w)| *w)
    }
}

pub const ELSEVIER: JournalPatternSet = JournalPatternSet {
    family: JournalFamily::Elsevier,
    canonical_class: "elsarticle",
    document_class_names: &["elsarticle", "cas-sc", "cas-dc"],
    document_class_weight: 10,
    command_weights: &[
        (r"\journal{", 5),
        (r"\begin{frontmatter}", 3),
        (r"\ead{", 3),
        (r"\cortext[", 3),
        (r"\begin{highlights}", 3),
        (r"\address{", 2),
        (r"\fntext[", 2),
        (r"\tnotetext[", 2),
        (r"\begin{graphicalabstract}", 2),
    ],
};

pub const SPRINGER_NATURE: JournalPatternSet = JournalPatternSet {
    family: JournalFamily::SpringerNature,
    canonical_class: "sn-jnl",
    document_class_names: &["sn-jnl", "svjour3", "svjour", "llncs"],
    document_class_weight: 10,
    command_weights: &[
        (r"\bmhead{", 4),
        (r"\orgname{", 4),
        (r"\orgdiv{", 3),
        (r"\orgaddress{", 3),
        (r"\backmatter", 3),
        (r"\affil[", 2),
        (r"\institute{", 2),
    ],
};

pub const IEEE: JournalPatternSet = JournalPatternSet {
    family: JournalFamily::Ieee,
    canonical_class: "IEEEtran",
    document_class_names: &["IEEEtran"],
    document_class_weight: 10,
    command_weights: &[
        (r"\IEEEPARstart", 5),
        (r"\IEEEauthorblockN", 5),
        (r"\IEEEkeywords", 4),
        (r"\begin{IEEEkeywords}", 4),
        (r"\IEEEauthorblockA", 4),
        (r"\IEEEmembership", 4),
        (r"\IEEEoverridecommandlockouts", 3),
        (r"\IEEEpeerreviewmaketitle", 3),
        (r"\begin{IEEEbiography}", 3),
    ],
};

pub const ACM: JournalPatternSet = JournalPatternSet {
    family: JournalFamily::Acm,
    canonical_class: "acmart",
    document_class_names: &["acmart", "sig-alternate", "acm_proc_article-sp"],
    document_class_weight: 10,
    command_weights: &[
        (r"\acmConference", 5),
        (r"\acmJournal", 5),
        (r"\ccsdesc", 4),
        (r"\begin{CCSXML}", 4),
        (r"\acmDOI", 3),
        (r"\acmYear", 3),
        (r"\acmBooktitle", 3),
        (r"\settopmatter", 3),
        (r"\setcopyright", 2),
    ],
};

/// All publisher pattern sets in tie-break priority order.
pub static PATTERN_SETS: [JournalPatternSet; 4] = [ELSEVIER, SPRINGER_NATURE, IEEE, ACM];

/// Springer Nature reference styles, selected by the first marker present.
/// Longer names come before their prefixes.
pub(crate) const SPRINGER_BIB_STYLES: &[&str] = &[
    "sn-mathphys-num",
    "sn-mathphys-ay",
    "sn-vancouver-num",
    "sn-vancouver-ay",
    "sn-mathphys",
    "sn-vancouver",
    "sn-aps",
    "sn-apa",
    "sn-chicago",
    "sn-nature",
];

pub(crate) const SPRINGER_DEFAULT_BIB_STYLE: &str = "sn-basic";

/// Verbatim fragment identifying the IEEE Transactions on Medical Imaging logo.
pub(crate) const TMI_LOGO_FRAGMENT: &str = "LOGO-tmi-web";
pub(crate) const TMI_LOGO_FILE: &str = "LOGO-tmi-web.eps";
