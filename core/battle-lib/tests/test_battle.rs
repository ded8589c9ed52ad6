use battle_lib::*;

const BATTLE_TOML: &str = include_str!("fixtures/battle.toml");

fn setup_game() -> Game {
    let config = BattleConfig::from_toml_str(BATTLE_TOML).expect("場景設定應可解析");
    Game::from_config(&config).expect("場景設定應可轉為 Game")
}

fn life(game: &Game, creature_id: &str) -> LifePoints {
    game.roster
        .find_creature(creature_id)
        .expect("生物應存在")
        .life_points
}

fn pos_of(game: &Game, creature_id: &str) -> Pos {
    game.grid
        .find_square_by_creature_id(creature_id)
        .expect("生物應在棋盤上")
        .pos
}

// ============================================================================
// 完整回合流程
// ============================================================================

#[test]
fn test_three_turns() {
    let mut chooser = FirstEmptySquares;
    let game = setup_game();
    assert_eq!(game.cards_on_players_hand, vec!["ally-1", "ally-2"]);
    assert_eq!(game.cards_in_deck, vec!["ally-3"]);

    // 第 1 回合
    let game = start_battle(&game, &mut chooser).expect("開戰應成功");
    assert_eq!(pos_of(&game, "enemy-1"), Pos::new(0, 0));
    let game = place_creature(&game, "ally-1", Pos::new(0, 1)).expect("配置應成功");
    assert_eq!(
        game.roster.find_creature("ally-1").unwrap().placement_order,
        2,
        "玩家配置的生物應排在已出現的敵人之後"
    );

    let game = run_auto_attack_phase(&game).expect("自動攻擊應成功");
    assert_eq!(life(&game, "enemy-1"), 1);
    assert_eq!(life(&game, "ally-1"), 3);

    let game = proceed_turn(&game, &mut chooser).expect("推進回合應成功");
    assert_eq!(game.turn_number, 2);
    assert_eq!(game.action_points, 5);
    assert_eq!(game.headquarters_life_points, 3, "有攻擊的敵人不突襲");
    assert_eq!(game.cards_on_players_hand, vec!["ally-2", "ally-3"]);
    assert!(game.cards_in_deck.is_empty());
    assert_eq!(pos_of(&game, "enemy-2"), Pos::new(0, 2));
    assert_eq!(pos_of(&game, "enemy-3"), Pos::new(1, 0));

    // 第 2 回合：ally-1 優先攻擊配置順序最小的 enemy-1
    let game = run_auto_attack_phase(&game).expect("自動攻擊應成功");
    assert_eq!(life(&game, "enemy-1"), 0);
    assert_eq!(life(&game, "enemy-2"), 3);
    assert_eq!(life(&game, "ally-1"), 2);
    assert!(!game.roster.find_creature("enemy-3").unwrap().auto_attack_invoked);

    let game = proceed_turn(&game, &mut chooser).expect("推進回合應成功");
    assert!(!game.grid.is_on_grid("enemy-1"), "陣亡的敵人應離開棋盤");
    assert!(game.roster.find_creature("enemy-1").is_ok());
    assert_eq!(game.headquarters_life_points, 2, "enemy-3 沒有攻擊，應突襲本部");
    assert_eq!(game.roster.find_creature("enemy-3").unwrap().raid_charge, 0);
    assert_eq!(game.turn_number, 3);
    assert_eq!(game.battle_result, BattleResult::Pending);

    // 第 3 回合：弓手同時攻擊兩個目標
    let game = place_creature(&game, "ally-2", Pos::new(1, 1)).expect("配置應成功");
    let targeting =
        calculate_range_and_targets_of_auto_attack(&game, "ally-2").expect("應可計算目標");
    assert_eq!(targeting.targets, vec!["enemy-2", "enemy-3"]);
    assert!(!targeting.reachable.contains(&Pos::new(1, 1)));

    let game = run_auto_attack_phase(&game).expect("自動攻擊應成功");
    assert_eq!(life(&game, "enemy-2"), 0);
    assert_eq!(life(&game, "enemy-3"), 2);
    assert_eq!(life(&game, "ally-2"), 1);

    let game = proceed_turn(&game, &mut chooser).expect("推進回合應成功");
    assert_eq!(game.turn_number, 4);
    assert_eq!(game.headquarters_life_points, 2);
    assert_eq!(game.cards_on_players_hand, vec!["ally-3"]);
    assert_eq!(game.phase(), TurnPhase::AwaitingAutoAttack);
}

#[test]
fn test_player_death_returns_card_to_deck() {
    let mut chooser = FirstEmptySquares;
    let game = setup_game();
    let game = start_battle(&game, &mut chooser).expect("開戰應成功");
    let game = place_creature(&game, "ally-2", Pos::new(0, 1)).expect("配置應成功");

    let mut ally = game.roster.find_creature("ally-2").unwrap().clone();
    ally.life_points = 1;
    let game = Game {
        roster: game.roster.with_creature(ally).unwrap(),
        ..game
    };

    let game = run_auto_attack_phase(&game).expect("自動攻擊應成功");
    assert!(game.roster.find_creature("ally-2").unwrap().is_dead());

    // 手牌 ally-1，牌庫 ally-3 ++ ally-2，補牌後手牌取牌庫前端
    let game = proceed_turn(&game, &mut chooser).expect("推進回合應成功");
    assert!(!game.grid.is_on_grid("ally-2"));
    assert_eq!(game.cards_on_players_hand, vec!["ally-1", "ally-3"]);
    assert_eq!(game.cards_in_deck, vec!["ally-2"]);
    assert_eq!(life(&game, "ally-2"), 2, "回到牌庫的生物生命值應回滿");
}

#[test]
fn test_failed_command_keeps_snapshot() {
    let game = start_battle(&setup_game(), &mut FirstEmptySquares).expect("開戰應成功");
    let state = ApplicationState::with_battle(game.clone());

    let err = state
        .place_creature("ally-1", Pos::new(0, 0))
        .expect_err("已有生物的格子不可配置");
    assert!(matches!(root_error(&err), Error::SquareOccupied { .. }));

    let err = state
        .place_creature("ally-3", Pos::new(1, 1))
        .expect_err("不在手牌的卡片不可配置");
    assert!(matches!(root_error(&err), Error::CardNotInHand { .. }));

    assert_eq!(state.game(), Some(&game));
}

#[test]
fn test_application_flow() {
    let state = ApplicationState::with_battle(setup_game());
    let state = state
        .start_battle(&mut FirstEmptySquares)
        .expect("開戰應成功");
    assert_eq!(pos_of(state.game().unwrap(), "enemy-1"), Pos::new(0, 0));
    assert!(
        state.start_battle(&mut FirstEmptySquares).is_err(),
        "同一場戰鬥不可重複開戰"
    );

    let state = state
        .select_card_on_players_hand("ally-1")
        .expect("選取手牌應成功");
    assert_eq!(
        state.game().unwrap().cursor,
        Some(Cursor::Card("ally-1".to_string()))
    );
    let state = state.select_square(2, 2).expect("選取格子應成功");
    let state = state
        .place_creature("ally-1", Pos::new(2, 2))
        .expect("配置應成功");
    assert_eq!(state.game().unwrap().cursor, None);

    let state = state.run_auto_attack_phase().expect("自動攻擊應成功");
    let state = state
        .proceed_turn(&mut FirstEmptySquares)
        .expect("推進回合應成功");
    let game = state.game().unwrap();
    assert_eq!(game.turn_number, 2);
    // enemy-1 與 ally-1 不相鄰，enemy-1 突襲
    assert_eq!(game.headquarters_life_points, 2);
}
