// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static option catalogs offered by the capture wizard.
//!
//! Every entry is keyed by a short symbolic code that travels in button
//! payloads. Labels are the values written to the remote store. Display
//! glyphs are not part of the catalog; the presentation layer owns them.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A `{code, label}` pair as shown in a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub label: &'static str,
}

/// Shared behavior of every catalog enum.
pub trait CatalogItem: Copy + Sized + 'static {
    /// Human-readable name of the wizard step this catalog belongs to.
    const STEP: &'static str;

    fn code(self) -> &'static str;

    fn label(self) -> &'static str;

    /// Looks up an entry by its symbolic code.
    fn from_code(code: &str) -> Option<Self>;

    fn entry(self) -> CatalogEntry {
        CatalogEntry {
            code: self.code(),
            label: self.label(),
        }
    }
}

/// Returns every entry of a catalog in declaration order.
pub fn entries<T: CatalogItem + IntoEnumIterator>() -> Vec<CatalogEntry> {
    T::iter().map(CatalogItem::entry).collect()
}

macro_rules! impl_catalog_item {
    ($ty:ty, $step:literal) => {
        impl CatalogItem for $ty {
            const STEP: &'static str = $step;

            fn code(self) -> &'static str {
                self.into()
            }

            fn label(self) -> &'static str {
                <$ty>::label(self)
            }

            fn from_code(code: &str) -> Option<Self> {
                code.parse().ok()
            }
        }
    };
}

/// Content frameworks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
pub enum Framework {
    #[strum(serialize = "cc")]
    ConcurrentContractor,
    #[strum(serialize = "operate")]
    Operate,
    #[strum(serialize = "chaos")]
    Chaos,
}

impl Framework {
    pub fn label(self) -> &'static str {
        match self {
            Framework::ConcurrentContractor => "The Concurrent Contractor™",
            Framework::Operate => "OPERATE Framework™",
            Framework::Chaos => "CHAOS Framework",
        }
    }

    /// Modules offered once this framework has been chosen.
    ///
    /// Only the Concurrent Contractor framework has the five-part curriculum;
    /// every other framework shares the generic set.
    pub fn modules(self) -> &'static [Module] {
        match self {
            Framework::ConcurrentContractor => &Module::CURRICULUM,
            Framework::Operate | Framework::Chaos => &Module::GENERIC,
        }
    }
}

impl_catalog_item!(Framework, "framework");

/// Modules and generic categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
pub enum Module {
    #[strum(serialize = "mindset")]
    Mindset,
    #[strum(serialize = "motive")]
    Motive,
    #[strum(serialize = "market")]
    Market,
    #[strum(serialize = "manage")]
    Manage,
    #[strum(serialize = "launchpad")]
    Launchpad,
    #[strum(serialize = "general")]
    General,
    #[strum(serialize = "marketing")]
    MarketingFunnel,
    #[strum(serialize = "leadmagnet")]
    LeadMagnet,
}

impl Module {
    /// The five-part curriculum of the Concurrent Contractor framework.
    pub const CURRICULUM: [Module; 5] = [
        Module::Mindset,
        Module::Motive,
        Module::Market,
        Module::Manage,
        Module::Launchpad,
    ];

    /// Categories shared by all other frameworks.
    pub const GENERIC: [Module; 3] = [Module::General, Module::MarketingFunnel, Module::LeadMagnet];

    pub fn label(self) -> &'static str {
        match self {
            Module::Mindset => "Module 1: Mindset",
            Module::Motive => "Module 2: Motive",
            Module::Market => "Module 3: Market",
            Module::Manage => "Module 4: Manage",
            Module::Launchpad => "Module 5: Launchpad",
            Module::General => "General Framework",
            Module::MarketingFunnel => "Marketing Funnel",
            Module::LeadMagnet => "Lead Magnet",
        }
    }
}

impl_catalog_item!(Module, "module");

/// The kind of asset a story will become.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
pub enum ContentType {
    #[strum(serialize = "module")]
    CourseModule,
    #[strum(serialize = "worksheet")]
    Worksheet,
    #[strum(serialize = "template")]
    Template,
    #[strum(serialize = "email")]
    EmailCampaign,
    #[strum(serialize = "leadmagnet")]
    LeadMagnet,
    #[strum(serialize = "assessment")]
    Assessment,
}

impl ContentType {
    pub fn label(self) -> &'static str {
        match self {
            ContentType::CourseModule => "Course Module",
            ContentType::Worksheet => "Worksheet",
            ContentType::Template => "Template",
            ContentType::EmailCampaign => "Email Campaign",
            ContentType::LeadMagnet => "Lead Magnet",
            ContentType::Assessment => "Assessment",
        }
    }

    pub fn all() -> Vec<ContentType> {
        ContentType::iter().collect()
    }
}

impl_catalog_item!(ContentType, "content type");

/// Target audiences. Only used as the record's default audience today.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
    Serialize, Deserialize,
)]
pub enum Audience {
    #[strum(serialize = "contractors")]
    ProfessionalContractors,
    #[strum(serialize = "consultants")]
    Consultants,
    #[strum(serialize = "interim")]
    InterimManagers,
    #[default]
    #[strum(serialize = "all")]
    AllConcurrentContractors,
    #[strum(serialize = "clients")]
    PotentialClients,
    #[strum(serialize = "subscribers")]
    EmailSubscribers,
}

impl Audience {
    pub fn label(self) -> &'static str {
        match self {
            Audience::ProfessionalContractors => "Professional Contractors",
            Audience::Consultants => "Consultants",
            Audience::InterimManagers => "Interim Managers",
            Audience::AllConcurrentContractors => "All Concurrent Contractors",
            Audience::PotentialClients => "Potential Clients",
            Audience::EmailSubscribers => "Email Subscribers",
        }
    }
}

impl_catalog_item!(Audience, "audience");
