use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Speaker attribution for a transcript turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in the chat transcript. Immutable once appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Security checklist item: closed enum, no dynamic items.
///
/// `ALL` fixes the declared order; collectors and renderers must walk it
/// rather than sorting or relying on map iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistItem {
    Vpc,
    SubnetSeparation,
    SecurityGroups,
    IamLeastPrivilege,
    DataEncryption,
    LoadBalancer,
    Waf,
    CloudFront,
    CloudTrail,
    CloudWatch,
    CloudWatchLogs,
}

impl ChecklistItem {
    /// Every item, in checklist order.
    pub const ALL: [ChecklistItem; 11] = [
        Self::Vpc,
        Self::SubnetSeparation,
        Self::SecurityGroups,
        Self::IamLeastPrivilege,
        Self::DataEncryption,
        Self::LoadBalancer,
        Self::Waf,
        Self::CloudFront,
        Self::CloudTrail,
        Self::CloudWatch,
        Self::CloudWatchLogs,
    ];

    /// Stable key used to address an item from the CLI.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Vpc => "vpc",
            Self::SubnetSeparation => "subnets",
            Self::SecurityGroups => "security-groups",
            Self::IamLeastPrivilege => "iam",
            Self::DataEncryption => "encryption",
            Self::LoadBalancer => "load-balancer",
            Self::Waf => "waf",
            Self::CloudFront => "cloudfront",
            Self::CloudTrail => "cloudtrail",
            Self::CloudWatch => "cloudwatch",
            Self::CloudWatchLogs => "cloudwatch-logs",
        }
    }

    /// Human-readable label embedded into prompts and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vpc => "VPC applied",
            Self::SubnetSeparation => "Public/private subnet separation",
            Self::SecurityGroups => "Security group configured",
            Self::IamLeastPrivilege => "IAM least-privilege permissions",
            Self::DataEncryption => "Data encryption",
            Self::LoadBalancer => "Load balancer configured",
            Self::Waf => "WAF configured",
            Self::CloudFront => "CloudFront configured",
            Self::CloudTrail => "CloudTrail configured",
            Self::CloudWatch => "CloudWatch configured",
            Self::CloudWatchLogs => "CloudWatch logs configured",
        }
    }

    /// Resolve a CLI key back to an item.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.key() == key)
    }
}

impl std::fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
