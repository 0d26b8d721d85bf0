macro_rules! program {
    ($key:expr, $duration:literal) => {{
        program!($key, $duration, None)
    }};
    ($key:expr, $duration:literal, $show:expr) => {{
        let show: Option<&str> = $show;
        crate::models::Program {
            server_key: Some("test".to_string()),
            key: Some($key.to_string()),
            title: Some($key.to_string()),
            program_type: crate::models::ProgramType::Custom,
            duration: humantime::parse_duration($duration).unwrap().as_millis() as i64,
            custom_show_id: show.map(|id| id.to_string()),
            ..Default::default()
        }
    }};
    ($key:expr, $duration:literal, $show:expr, $order:expr) => {{
        let mut program = program!($key, $duration, Some($show));
        program.custom_order = Some($order);
        program
    }};
}

macro_rules! episode {
    ($key:expr, $show_title:expr, $season:expr, $episode:expr) => {
        crate::models::Program {
            server_key: Some("test".to_string()),
            key: Some($key.to_string()),
            program_type: crate::models::ProgramType::Episode,
            duration: 1_800_000,
            show_title: Some($show_title.to_string()),
            season: Some($season),
            episode: Some($episode),
            ..Default::default()
        }
    };
}

macro_rules! schedule {
    ($($json:tt)+) => {
        serde_json::from_value::<crate::schedule::RawSchedule>(serde_json::json!($($json)+))
            .unwrap()
    };
}
