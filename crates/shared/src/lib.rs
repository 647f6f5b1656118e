pub mod conversation;

pub mod settings {
    use serde::{Deserialize, Serialize};

    fn default_true() -> bool {
        true
    }

    fn default_chart_color() -> String {
        "#8884d8".to_string()
    }

    fn default_chart_opacity() -> u8 {
        100
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ProviderAuth {
        pub api_key: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelSettings {
        pub gemini_model: String, // e.g., "gemini-pro"
        pub gemini_auth: ProviderAuth,
        /// Creativity control, 0.0..=1.0.
        pub temperature: f32,
        /// Upper bound on reply length.
        pub max_output_tokens: u32,
    }

    /// Presentation defaults for the data tab's chart.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChartDefaults {
        #[serde(default = "default_chart_color")]
        pub color: String, // "#rrggbb"
        #[serde(default = "default_chart_opacity")]
        pub opacity: u8, // 0..=100
        #[serde(default = "default_true")]
        pub show_grid: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AppSettings {
        pub model: ModelSettings,
        #[serde(default)]
        pub chart: ChartDefaults,
        #[serde(default = "default_true")]
        pub dark_mode: bool,
    }

    impl Default for ModelSettings {
        fn default() -> Self {
            Self {
                gemini_model: "gemini-pro".into(),
                gemini_auth: ProviderAuth::default(),
                temperature: 0.7,
                max_output_tokens: 1000,
            }
        }
    }

    impl Default for ChartDefaults {
        fn default() -> Self {
            Self {
                color: default_chart_color(),
                opacity: default_chart_opacity(),
                show_grid: true,
            }
        }
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                model: ModelSettings::default(),
                chart: ChartDefaults::default(),
                dark_mode: true,
            }
        }
    }
}
