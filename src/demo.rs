//! Built-in demonstration questions

/// Questions that span several frameworks, used by the `demo` command
pub const DEMO_QUESTIONS: [&str; 5] = [
    "How do DoDAF CV-2 and CV-5 differ when aligning capability gaps with responsible organizations?",
    "What guidance do TOGAF ADM Phase D, the NIST CPS AF Physical Viewpoint, and the ArchiMate Technology Layer provide when designing an edge sensor platform?",
    "How can human-in-the-loop governance be maintained when mapping MODAF OpV-5 activities to UAF Projects Viewpoint milestones while addressing NIST CPS AF Crosscutting Concerns for safety-critical missions?",
    "Which architecture viewpoints best align AIoT edge analytics with enterprise services, and how do the NIST CPS AF Functional Viewpoint, TOGAF ADM Phase C, and the ArchiMate Application Layer complement one another?",
    "Where should technical-debt remediation be captured when combining the TOGAF Architecture Requirements Specification, the ArchiMate Implementation & Migration Layer, and Zachman Row 5 component assemblies?",
];
