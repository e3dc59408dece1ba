/// Samsung Health exercise type codes and their human readable names,
/// sorted by code.
///
/// The names are used verbatim as output folder names, so they must stay
/// free of path separators.
pub const EXERCISE_TYPES: &[(i64, &str)] = &[
    (0, "Custom type"),
    (1001, "Walking"),
    (1002, "Running"),
    (2001, "Baseball, general"),
    (2002, "Softball, general"),
    (2003, "Cricket"),
    (3001, "Golf, general"),
    (3002, "Billiards"),
    (3003, "Bowling, alley"),
    (4001, "Hockey"),
    (4002, "Rugby, touch, non-competitive"),
    (4003, "Basketball, general"),
    (4004, "Football, general (Soccer)"),
    (4005, "Handball, general"),
    (4006, "American football, general, touch"),
    (5001, "Volleyball, general"),
    (5002, "Beach volleyball"),
    (6001, "Squash, general"),
    (6002, "Tennis, general"),
    (6003, "Badminton, competitive"),
    (6004, "Table tennis"),
    (6005, "Racquetball, general"),
    (7001, "Thai chi, general"),
    (7002, "Boxing, in ring"),
    (7003, "Martial arts, moderate pace (Judo, Jujitsu, Karate, Taekwondo)"),
    (8001, "Ballet, general, rehearsal or class"),
    (8002, "Dancing, general (Fork, Irish step, Polka)"),
    (8003, "Ballroom dancing, fast"),
    (9001, "Pilates"),
    (9002, "Yoga"),
    (10001, "Stretching"),
    (10002, "Jump rope, moderate pace, 2 foot skip"),
    (10003, "Hula-hooping"),
    (10004, "Push-ups (Press-ups)"),
    (10005, "Pull-ups (Chin-up)"),
    (10006, "Sit-ups"),
    (10007, "Circuit training, moderate effort"),
    (10008, "Mountain climbers"),
    (10009, "Jumping Jacks"),
    (10010, "Burpee"),
    (10011, "Bench press"),
    (10012, "Squats"),
    (10013, "Lunges"),
    (10014, "Leg presses"),
    (10015, "Leg extensions"),
    (10016, "Leg curls"),
    (10017, "Back extensions"),
    (10018, "Lat pull-downs"),
    (10019, "Deadlifts"),
    (10020, "Shoulder presses"),
    (10021, "Front raises"),
    (10022, "Lateral raises"),
    (10023, "Crunches"),
    (10024, "Leg raises"),
    (10025, "Plank"),
    (10026, "Arm curls"),
    (10027, "Arm extensions"),
    (11001, "Inline skating, moderate pace"),
    (11002, "Hang gliding"),
    (11003, "Pistol shooting"),
    (11004, "Archery, non-hunting"),
    (11005, "Horseback riding, general"),
    (11007, "Cycling"),
    (11008, "Flying disc, general, playing"),
    (11009, "Roller skating"),
    (12001, "Aerobics, general"),
    (13001, "Hiking"),
    (13002, "Rock climbing, low to moderate difficulty"),
    (13003, "Backpacking"),
    (13004, "Mountain biking, general"),
    (13005, "Orienteering"),
    (14001, "Swimming, general, leisurely, not lap swimming"),
    (14002, "Aquarobics"),
    (14003, "Canoeing, general, for pleasure"),
    (14004, "Sailing, leisure, ocean sailing"),
    (14005, "Scuba diving, general"),
    (14006, "Snorkeling"),
    (14007, "Kayaking, moderate effort"),
    (14008, "Kitesurfing"),
    (14009, "Rafting"),
    (14010, "Rowing machine, general, for pleasure"),
    (14011, "Windsurfing, general"),
    (14012, "Yachting, leisure"),
    (14013, "Water skiing"),
    (15001, "Step machine"),
    (15002, "Weight machine"),
    (15003, "Exercise bike, Moderate to vigorous effort (90-100 watts)"),
    (15004, "Rowing machine"),
    (15005, "Treadmill, combination of jogging and walking"),
    (15006, "Elliptical trainer, moderate effort"),
    (16001, "Cross-country skiing, general, moderate speed"),
    (16002, "Skiing, general, downhill, moderate effort"),
    (16003, "Ice dancing"),
    (16004, "Ice skating, general"),
    (16006, "Ice hockey, general"),
    (16007, "Snowboarding, general, moderate effort"),
    (16008, "Alpine skiing, general, moderate effort"),
    (16009, "Snowshoeing, moderate effort"),
];

/// Look up the category label for an exercise type code
pub fn category_label(code: i64) -> Option<&'static str> {
    EXERCISE_TYPES
        .binary_search_by_key(&code, |&(c, _)| c)
        .ok()
        .map(|index| EXERCISE_TYPES[index].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(category_label(0), Some("Custom type"));
        assert_eq!(category_label(1001), Some("Walking"));
        assert_eq!(category_label(1002), Some("Running"));
        assert_eq!(category_label(11007), Some("Cycling"));
        assert_eq!(category_label(16009), Some("Snowshoeing, moderate effort"));
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(category_label(-1), None);
        assert_eq!(category_label(1003), None);
        assert_eq!(category_label(11006), None);
        assert_eq!(category_label(99999), None);
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        // binary search relies on strictly increasing codes
        assert!(EXERCISE_TYPES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_labels_are_valid_folder_names() {
        for (code, label) in EXERCISE_TYPES {
            assert!(!label.is_empty(), "empty label for {}", code);
            assert!(
                !label.contains(['/', '\\', ':']),
                "label for {} contains a path separator: {}",
                code,
                label
            );
        }
    }
}
