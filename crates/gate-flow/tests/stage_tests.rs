use gate_flow::{allowed_transitions, validate_transition, Request, Stage, View};
use gate_puzzle::normalize;
use gate_test_utils::TestGate;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Wait(i64),
    Send(Request),
    /// Submit whatever answer is stored right now, if any
    SubmitStored,
}

fn stage() -> impl Strategy<Value = Stage> {
    prop_oneof![Just(Stage::Queue), Just(Stage::Captcha), Just(Stage::Assign)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..40).prop_map(Op::Wait),
        Just(Op::Send(Request::Index)),
        Just(Op::Send(Request::ShowCaptcha)),
        Just(Op::Send(Request::ShowAssign)),
        Just(Op::SubmitStored),
        (1u8..=9, 1u8..=9).prop_map(|(c, r)| Op::Send(Request::SubmitAnswer(format!("{c}-{r}")))),
        "[0-9 -]{0,5}".prop_map(|s| Op::Send(Request::SubmitAnswer(s))),
    ]
}

proptest! {
    #[test]
    fn prop_transitions_match_allowed_list(from in stage(), to in stage()) {
        let res = validate_transition(from, to);
        prop_assert_eq!(res.is_ok(), allowed_transitions(from).contains(&to));
    }

    #[test]
    fn prop_solved_only_by_correct_submission(ops in proptest::collection::vec(op(), 1..40)) {
        let gate = TestGate::new();
        let mut id = gate.enter();

        for op in ops {
            let request = match op {
                Op::Wait(secs) => {
                    gate.clock.advance(secs);
                    continue;
                }
                Op::Send(request) => request,
                Op::SubmitStored => match gate.state(&id).pending_answer() {
                    Some(answer) => Request::SubmitAnswer(answer.to_string()),
                    None => continue,
                },
            };

            let before = gate.state(&id);
            let response = gate.request(&id, request.clone());
            if response.session_id != id {
                // idled out; the replacement starts over
                id = response.session_id;
                prop_assert!(!gate.state(&id).is_solved());
                continue;
            }
            let after = gate.state(&id);

            if after.is_solved() && !before.is_solved() {
                let Request::SubmitAnswer(raw) = &request else {
                    return Err(TestCaseError::fail("solved without a submission"));
                };
                let normalized = normalize(raw);
                prop_assert_eq!(Some(normalized.as_str()), before.pending_answer());
                prop_assert_eq!(response.view, View::Assign);
            }
            if after.stage() == Stage::Assign {
                prop_assert!(after.is_solved());
            }
        }
    }
}
