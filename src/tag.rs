//! Entry tags and the grammar each one selects.
//!
//! The tag is the first byte of every entry. Only name literals and a few
//! symbol records have a payload grammar here; every other tag is
//! [`EntryKind::Unsupported`] and is skipped by length.

use core::fmt;

/// Tag byte of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u8);

impl Tag {
    pub const TERM_NAME: Tag = Tag(1);
    pub const TYPE_NAME: Tag = Tag(2);
    pub const NONE_SYM: Tag = Tag(3);
    pub const TYPE_SYM: Tag = Tag(4);
    pub const ALIAS_SYM: Tag = Tag(5);
    pub const CLASS_SYM: Tag = Tag(6);
    pub const MODULE_SYM: Tag = Tag(7);
    pub const VAL_SYM: Tag = Tag(8);
    pub const EXT_REF: Tag = Tag(9);
    pub const EXT_MOD_CLASS_REF: Tag = Tag(10);
    pub const NO_TPE: Tag = Tag(11);
    pub const NO_PREFIX_TPE: Tag = Tag(12);
    pub const THIS_TPE: Tag = Tag(13);
    pub const SINGLE_TPE: Tag = Tag(14);
    pub const CONSTANT_TPE: Tag = Tag(15);
    pub const TYPE_REF_TPE: Tag = Tag(16);
    pub const TYPE_BOUNDS_TPE: Tag = Tag(17);
    pub const REFINED_TPE: Tag = Tag(18);
    pub const CLASS_INFO_TPE: Tag = Tag(19);
    pub const METHOD_TPE: Tag = Tag(20);
    pub const POLY_TPE: Tag = Tag(21);
    pub const IMPLICIT_METHOD_TPE: Tag = Tag(22);
    pub const LITERAL_UNIT: Tag = Tag(24);
    pub const LITERAL_BOOLEAN: Tag = Tag(25);
    pub const LITERAL_BYTE: Tag = Tag(26);
    pub const LITERAL_SHORT: Tag = Tag(27);
    pub const LITERAL_CHAR: Tag = Tag(28);
    pub const LITERAL_INT: Tag = Tag(29);
    pub const LITERAL_LONG: Tag = Tag(30);
    pub const LITERAL_FLOAT: Tag = Tag(31);
    pub const LITERAL_DOUBLE: Tag = Tag(32);
    pub const LITERAL_STRING: Tag = Tag(33);
    pub const LITERAL_NULL: Tag = Tag(34);
    pub const LITERAL_CLASS: Tag = Tag(35);
    pub const LITERAL_ENUM: Tag = Tag(36);
    pub const SYM_ANNOT: Tag = Tag(40);
    pub const CHILDREN: Tag = Tag(41);
    pub const ANNOTATED_TPE: Tag = Tag(42);
    pub const ANNOT_INFO: Tag = Tag(43);
    pub const ANNOT_ARG_ARRAY: Tag = Tag(44);
    pub const DE_BRUIJN_INDEX_TPE: Tag = Tag(47);
    pub const EXISTENTIAL_TPE: Tag = Tag(48);
    pub const TREE: Tag = Tag(49);
    pub const MODIFIERS: Tag = Tag(50);
    pub const SUPER_TPE: Tag = Tag(52);

    /// Raw tag byte.
    pub fn byte(self) -> u8 {
        self.0
    }

    /// Payload grammar selected by this tag.
    pub fn kind(self) -> EntryKind {
        match self {
            Self::TERM_NAME | Self::TYPE_NAME => EntryKind::Name,
            Self::TYPE_SYM | Self::ALIAS_SYM | Self::MODULE_SYM => EntryKind::Symbol,
            _ => EntryKind::Unsupported,
        }
    }

    /// Mnemonic used by the pickle format tables, `None` for unknown bytes.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            1 => "TERMname",
            2 => "TYPEname",
            3 => "NONEsym",
            4 => "TYPEsym",
            5 => "ALIASsym",
            6 => "CLASSsym",
            7 => "MODULEsym",
            8 => "VALsym",
            9 => "EXTref",
            10 => "EXTMODCLASSref",
            11 => "NOtpe",
            12 => "NOPREFIXtpe",
            13 => "THIStpe",
            14 => "SINGLEtpe",
            15 => "CONSTANTtpe",
            16 => "TYPEREFtpe",
            17 => "TYPEBOUNDStpe",
            18 => "REFINEDtpe",
            19 => "CLASSINFOtpe",
            20 => "METHODtpe",
            21 => "POLYtpe",
            22 => "IMPLICITMETHODtpe",
            24 => "LITERALunit",
            25 => "LITERALboolean",
            26 => "LITERALbyte",
            27 => "LITERALshort",
            28 => "LITERALchar",
            29 => "LITERALint",
            30 => "LITERALlong",
            31 => "LITERALfloat",
            32 => "LITERALdouble",
            33 => "LITERALstring",
            34 => "LITERALnull",
            35 => "LITERALclass",
            36 => "LITERALenum",
            40 => "SYMANNOT",
            41 => "CHILDREN",
            42 => "ANNOTATEDtpe",
            43 => "ANNOTINFO",
            44 => "ANNOTARGARRAY",
            47 => "DEBRUIJNINDEXtpe",
            48 => "EXISTENTIALtpe",
            49 => "TREE",
            50 => "MODIFIERS",
            52 => "SUPERtpe",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u8> for Tag {
    fn from(byte: u8) -> Self {
        Tag(byte)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Closed set of payload grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Raw name bytes filling the whole payload.
    Name,
    /// `name_Ref owner_Ref flags [privateWithin_Ref] info_Ref`.
    Symbol,
    /// No grammar; the entry is skipped by its declared length.
    Unsupported,
}
