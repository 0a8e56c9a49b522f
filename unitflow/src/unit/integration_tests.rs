//! End-to-end tests for unit declaration and invocation.

#[cfg(test)]
mod tests {
    use crate::config::{Configuration, Generation, ValidationMode};
    use crate::contracts::{AttributeContract, Schema, TypeShape, ViolationReason};
    use crate::core::{AttributeKind, Value};
    use crate::errors::codes;
    use crate::outcome::{Failure, Outcome};
    use crate::registry::ClassificationMode;
    use crate::testing::{
        assert_business_failure, assert_fatal, assert_output_value, assert_success,
        assert_validation_failure, assert_violation, copy_id_unit, isolated_configuration,
        StepRecorder, TestInputs,
    };
    use crate::unit::{RescueRule, Resolution, Stage, Step, UnitBuilder};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("payment gateway declined: {0}")]
    struct Declined(String);

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct ConnectionReset;

    #[test]
    fn test_copy_id_round_trip() {
        let configuration = isolated_configuration();
        let unit = copy_id_unit(&configuration).unwrap();

        let outcome = unit.call_in(&configuration, [("id", "abc")]);
        assert_output_value(&outcome, "id", &Value::from("abc"));

        let outcome = unit.call_in(&configuration, [("id", 123)]);
        assert_validation_failure(&outcome, AttributeKind::Input);
        assert_violation(&outcome, "id", ViolationReason::WrongType);
    }

    #[test]
    fn test_missing_required_input_runs_no_step() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let unit = UnitBuilder::new("Greet")
            .attribute(AttributeContract::input("name", TypeShape::string()))
            .with_step(recorder.step("greet"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_validation_failure(&outcome, AttributeKind::Input);
        assert_violation(&outcome, "name", ViolationReason::MissingRequired);
        assert_eq!(recorder.call_count(), 0);
    }

    #[test]
    fn test_collection_violations_name_each_index() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Tags")
            .attribute(AttributeContract::input("tags", TypeShape::array_of(TypeShape::string())))
            .build_in(&configuration)
            .unwrap();

        let tags = Value::array([Value::Integer(1), Value::from("ok"), Value::Boolean(true), Value::Float(2.0)]);
        let outcome = unit.call_in(&configuration, [("tags", tags)]);

        let details: Vec<&str> = outcome.violations().iter().map(|v| v.detail.as_str()).collect();
        assert_eq!(
            details,
            vec![
                "at [0]: expected String, got Integer",
                "at [2]: expected String, got Boolean",
                "at [3]: expected String, got Float",
            ]
        );
        assert!(outcome
            .violations()
            .iter()
            .all(|v| v.reason == ViolationReason::WrongElementType));
    }

    #[test]
    fn test_business_failure_halts_remaining_steps() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let unit = UnitBuilder::new("Checkout")
            .with_step(recorder.step("reserve"))
            .with_step(recorder.failing("charge", "payment_required", "card was declined"))
            .with_step(recorder.step("ship"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_business_failure(&outcome, "payment_required");
        assert_eq!(outcome.message().as_deref(), Some("card was declined"));
        assert_eq!(recorder.calls(), vec!["reserve", "charge"]);
    }

    #[test]
    fn test_first_registered_rescue_wins() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Charge")
            .step("charge", |_| Err(Declined("insufficient funds".into()).into()))
            .rescue(RescueRule::on::<Declined, _>(|err| {
                Resolution::fail_with_status("declined", err.to_string())
            }))
            .rescue(RescueRule::when(
                "everything",
                |_| true,
                |_| Resolution::fail_with_status("catch_all", "unexpected"),
            ))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_business_failure(&outcome, "declined");
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.message, "payment gateway declined: insufficient funds");
        assert_eq!(
            failure.meta["original_fault"],
            "payment gateway declined: insufficient funds"
        );
    }

    #[test]
    fn test_unmatched_fault_is_fatal() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let unit = UnitBuilder::new("Sync")
            .with_step(recorder.faulting("fetch", || ConnectionReset.into()))
            .with_step(recorder.step("store"))
            .rescue(RescueRule::on::<Declined, _>(|_| Resolution::Success))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_fatal(&outcome);
        assert!(outcome.fault().unwrap().downcast_ref::<ConnectionReset>().is_some());
        assert_eq!(recorder.calls(), vec!["fetch"]);
    }

    #[test]
    fn test_rescue_to_success_validates_outputs() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("BestEffort")
            .attribute(AttributeContract::output("synced", TypeShape::boolean()))
            .step("mark", |ctx| {
                ctx.set_output("synced", false)?;
                Ok(())
            })
            .step("sync", |_| Err(ConnectionReset.into()))
            .rescue(RescueRule::on::<ConnectionReset, _>(|_| Resolution::Success))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_output_value(&outcome, "synced", &Value::Boolean(false));
    }

    #[test]
    fn test_alias_is_the_only_name_inside_steps() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Notify")
            .attribute(AttributeContract::input("email_address", TypeShape::string()).with_alias("email"))
            .attribute(AttributeContract::output("sent_to", TypeShape::string()))
            .step("send", |ctx| {
                let email = ctx.input("email")?.clone();
                ctx.set_output("sent_to", email)?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("email_address", "ada@example.com")]);
        assert_output_value(&outcome, "sent_to", &Value::from("ada@example.com"));

        let outcome = unit.call_in(&configuration, [("email", "bob@example.com")]);
        assert_output_value(&outcome, "sent_to", &Value::from("bob@example.com"));

        let strict = UnitBuilder::new("NotifyByDeclarationName")
            .attribute(AttributeContract::input("email_address", TypeShape::string()).with_alias("email"))
            .step("send", |ctx| {
                ctx.input("email_address")?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = strict.call_in(&configuration, [("email", "ada@example.com")]);
        assert_validation_failure(&outcome, AttributeKind::Input);
        assert_violation(&outcome, "email_address", ViolationReason::UndefinedAttribute);
        assert_eq!(outcome.violations()[0].detail, "is exposed as `email`");
    }

    #[test]
    fn test_unexpected_input_is_rejected() {
        let configuration = isolated_configuration();
        let unit = copy_id_unit(&configuration).unwrap();

        let outcome = unit.call_in(&configuration, [("id", "abc"), ("admin", "true")]);
        assert_validation_failure(&outcome, AttributeKind::Input);
        assert_violation(&outcome, "admin", ViolationReason::UnexpectedInput);
    }

    #[test]
    fn test_internal_writes_validate_eagerly() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let hook = recorder.clone();
        let unit = UnitBuilder::new("Totals")
            .attribute(AttributeContract::internal("total", TypeShape::integer()))
            .step("sum", move |ctx| {
                hook.record("sum");
                ctx.set_internal("total", "forty-two")?;
                Ok(())
            })
            .with_step(recorder.step("report"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_validation_failure(&outcome, AttributeKind::Internal);
        assert_violation(&outcome, "total", ViolationReason::WrongType);
        assert_eq!(recorder.calls(), vec!["sum"]);
    }

    #[test]
    fn test_internal_values_flow_between_steps() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Double")
            .attribute(AttributeContract::input("n", TypeShape::integer()))
            .attribute(AttributeContract::internal("doubled", TypeShape::integer()))
            .attribute(AttributeContract::output("result", TypeShape::integer()))
            .step("double", |ctx| {
                let n = ctx.input("n")?.as_i64().unwrap_or_default();
                ctx.set_internal("doubled", n * 2)?;
                Ok(())
            })
            .step("publish", |ctx| {
                let doubled = ctx.internal("doubled")?.clone();
                ctx.set_output("result", doubled)?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("n", 21)]);
        assert_output_value(&outcome, "result", &Value::Integer(42));
    }

    #[test]
    fn test_output_validation_after_last_step() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let hook = recorder.clone();
        let unit = UnitBuilder::new("Broken")
            .attribute(AttributeContract::output("count", TypeShape::integer()))
            .step("count", |ctx| {
                ctx.set_output("count", "three")?;
                Ok(())
            })
            .step("after", move |_| {
                hook.record("after");
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_validation_failure(&outcome, AttributeKind::Output);
        assert_violation(&outcome, "count", ViolationReason::WrongType);
        assert_eq!(recorder.calls(), vec!["after"]);
    }

    #[test]
    fn test_undeclared_output_fails_immediately() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Leaky")
            .step("leak", |ctx| {
                ctx.set_output("secret", "x")?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_validation_failure(&outcome, AttributeKind::Output);
        assert_violation(&outcome, "secret", ViolationReason::UndefinedAttribute);
    }

    #[test]
    fn test_optional_defaults_and_prepare() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Search")
            .attribute(
                AttributeContract::input("query", TypeShape::string())
                    .with_prepare(|value| match value {
                        Value::String(text) => Value::from(text.trim().to_lowercase()),
                        other => other,
                    }),
            )
            .attribute(AttributeContract::input("page", TypeShape::integer()).optional().with_default(1))
            .attribute(AttributeContract::output("summary", TypeShape::string()))
            .step("summarise", |ctx| {
                let summary = format!(
                    "{} @ {}",
                    ctx.input("query")?.as_str().unwrap_or_default(),
                    ctx.input("page")?
                );
                ctx.set_output("summary", summary)?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("query", "  Rust ")]);
        assert_output_value(&outcome, "summary", &Value::from("rust @ 1"));
    }

    #[test]
    fn test_schema_defaults_are_written_into_input() {
        let configuration = isolated_configuration();
        let schema = Schema::new()
            .field("street", TypeShape::string())
            .optional_field("country", TypeShape::string(), Some(Value::from("NL")));
        let unit = UnitBuilder::new("Address")
            .attribute(AttributeContract::input("address", TypeShape::any_hash()).with_schema(schema))
            .attribute(AttributeContract::output("country", TypeShape::string()))
            .step("read", |ctx| {
                let country = ctx.input("address")?.get("country").cloned().unwrap_or_default();
                ctx.set_output("country", country)?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("address", Value::hash([("street", "Main")]))]);
        assert_output_value(&outcome, "country", &Value::from("NL"));

        let outcome = unit.call_in(&configuration, [("address", Value::hash([("street", 5)]))]);
        assert_violation(&outcome, "address", ViolationReason::SchemaMismatch);
    }

    #[test]
    fn test_permissive_mode_tolerates_type_errors_only() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Lenient")
            .validation_mode(ValidationMode::Permissive)
            .attribute(AttributeContract::input("id", TypeShape::string()))
            .attribute(AttributeContract::output("seen", TypeShape::string()))
            .step("echo", |ctx| {
                let seen = ctx.input("id")?.to_string();
                ctx.set_output("seen", seen)?;
                Ok(())
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("id", 7)]);
        assert_output_value(&outcome, "seen", &Value::from("7"));

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_violation(&outcome, "id", ViolationReason::MissingRequired);
    }

    #[test]
    fn test_mode_is_resolved_at_call_time() {
        let configuration = isolated_configuration();
        let unit = copy_id_unit(&configuration).unwrap();
        assert!(unit.call_in(&configuration, [("id", 1)]).is_failure());

        configuration.configure(Generation::Current, |scope| {
            scope.set_validation_mode(ValidationMode::Permissive);
        });
        let outcome = unit.call_in(&configuration, [("id", 1)]);
        assert_output_value(&outcome, "id", &Value::Integer(1));
    }

    #[test]
    fn test_early_success_skips_remaining_steps() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let unit = UnitBuilder::new("Cached")
            .attribute(AttributeContract::output("source", TypeShape::string()))
            .step("cache", |ctx| {
                ctx.set_output("source", "cache")?;
                ctx.succeed()
            })
            .with_step(recorder.step("database"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_output_value(&outcome, "source", &Value::from("cache"));
        assert_eq!(recorder.call_count(), 0);
    }

    #[test]
    fn test_fail_input_and_fail_with() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Register")
            .attribute(AttributeContract::input("email", TypeShape::string()))
            .step("check", |ctx| {
                if ctx.input("email")?.as_str() == Some("taken@example.com") {
                    return ctx.fail_input("email", "is already registered");
                }
                ctx.fail_with(Failure::with_status("closed", "registration is closed"))
            })
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("email", "taken@example.com")]);
        assert_business_failure(&outcome, "input");
        assert_eq!(outcome.failure().unwrap().meta["input_name"], "email");

        let outcome = unit.call_in(&configuration, [("email", "new@example.com")]);
        assert_business_failure(&outcome, "closed");
    }

    #[test]
    fn test_conditional_steps_and_stages() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let unit = UnitBuilder::new("Conditional")
            .attribute(AttributeContract::input("notify", TypeShape::boolean()))
            .with_step(recorder.step("always"))
            .with_step(recorder.step("notify").only_if(|ctx| ctx.query_input("notify")))
            .with_step(recorder.step("quiet").only_unless(|ctx| ctx.query_input("notify")))
            .stage(
                Stage::new()
                    .with_step(recorder.step("audit"))
                    .only_if(|ctx| ctx.query_input("notify")),
            )
            .build_in(&configuration)
            .unwrap();

        assert_success(&unit.call_in(&configuration, [("notify", true)]));
        assert_eq!(recorder.calls(), vec!["always", "notify", "audit"]);

        recorder.reset();
        assert_success(&unit.call_in(&configuration, [("notify", false)]));
        assert_eq!(recorder.calls(), vec!["always", "quiet"]);
    }

    #[test]
    fn test_wrapped_stage() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let log = recorder.clone();
        let unit = UnitBuilder::new("Transactional")
            .stage(
                Stage::new()
                    .with_step(recorder.step("insert"))
                    .with_step(recorder.step("update"))
                    .wrap_in(move |ctx, steps| {
                        log.record("begin");
                        let result = steps(ctx);
                        log.record(if result.is_ok() { "commit" } else { "abort" });
                        result
                    }),
            )
            .build_in(&configuration)
            .unwrap();

        assert_success(&unit.call_in(&configuration, TestInputs::new()));
        assert_eq!(recorder.calls(), vec!["begin", "insert", "update", "commit"]);
    }

    #[test]
    fn test_rollback_resumes_with_next_stage() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let log = recorder.clone();
        let unit = UnitBuilder::new("Compensating")
            .stage(
                Stage::new()
                    .with_step(recorder.faulting("reserve", || ConnectionReset.into()))
                    .with_step(recorder.step("confirm"))
                    .rollback(move |_, error| {
                        log.record(format!("rollback: {error}"));
                        Ok(())
                    }),
            )
            .with_step(recorder.step("notify"))
            .build_in(&configuration)
            .unwrap();

        assert_success(&unit.call_in(&configuration, TestInputs::new()));
        assert_eq!(
            recorder.calls(),
            vec!["reserve", "rollback: connection reset", "notify"]
        );
    }

    #[test]
    fn test_rollback_does_not_resume_after_declared_failure() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let log = recorder.clone();
        let unit = UnitBuilder::new("Charge")
            .stage(
                Stage::new()
                    .with_step(recorder.failing("charge", "declined", "card was declined"))
                    .rollback(move |_, error| {
                        log.record(format!("rollback: {error}"));
                        Ok(())
                    }),
            )
            .with_step(recorder.step("ship"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_business_failure(&outcome, "declined");
        assert_eq!(outcome.message().as_deref(), Some("card was declined"));
        assert_eq!(recorder.calls(), vec!["charge", "rollback: card was declined"]);
    }

    #[test]
    fn test_rollback_does_not_resume_after_internal_violation() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let log = recorder.clone();
        let unit = UnitBuilder::new("Totals")
            .attribute(AttributeContract::internal("total", TypeShape::integer()))
            .stage(
                Stage::new()
                    .step("sum", |ctx| {
                        ctx.set_internal("total", "not a number")?;
                        Ok(())
                    })
                    .rollback(move |_, _| {
                        log.record("rollback");
                        Ok(())
                    }),
            )
            .with_step(recorder.step("ship"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_validation_failure(&outcome, AttributeKind::Internal);
        assert_violation(&outcome, "total", ViolationReason::WrongType);
        assert_eq!(recorder.calls(), vec!["rollback"]);
    }

    #[test]
    fn test_rollback_does_not_resume_after_undefined_input() {
        let configuration = isolated_configuration();
        let recorder = StepRecorder::new();
        let log = recorder.clone();
        let unit = UnitBuilder::new("Notify")
            .attribute(AttributeContract::input("email_address", TypeShape::string()).with_alias("email"))
            .stage(
                Stage::new()
                    .step("send", |ctx| {
                        ctx.input("email_address")?;
                        Ok(())
                    })
                    .rollback(move |_, _| {
                        log.record("rollback");
                        Ok(())
                    }),
            )
            .with_step(recorder.step("ship"))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, [("email", "ada@example.com")]);
        assert_validation_failure(&outcome, AttributeKind::Input);
        assert_violation(&outcome, "email_address", ViolationReason::UndefinedAttribute);
        assert_eq!(recorder.calls(), vec!["rollback"]);
    }

    #[test]
    fn test_failed_rollback_keeps_declared_failure() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Refund")
            .stage(
                Stage::new()
                    .step("refund", |ctx| ctx.fail_with(Failure::with_status("rejected", "refund rejected")))
                    .rollback(|_, _| Err(ConnectionReset.into())),
            )
            .rescue(RescueRule::on::<ConnectionReset, _>(|_| Resolution::Success))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_business_failure(&outcome, "rejected");
    }

    #[test]
    fn test_rollback_error_propagates_to_rescue() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Unrecoverable")
            .stage(
                Stage::new()
                    .step("reserve", |_| Err(ConnectionReset.into()))
                    .rollback(|_, _| Err(Declined("rollback refused".into()).into())),
            )
            .rescue(RescueRule::on::<Declined, _>(|err| Resolution::fail(err.to_string())))
            .build_in(&configuration)
            .unwrap();

        let outcome = unit.call_in(&configuration, TestInputs::new());
        assert_business_failure(&outcome, Failure::BASE);
    }

    #[test]
    fn test_generation_registries_are_isolated() {
        let configuration = isolated_configuration();
        configuration.configure(Generation::Legacy, |scope| {
            scope.register(ClassificationMode::CollectionLike, "LegacyList");
        });
        let contract = AttributeContract::input("items", TypeShape::collection_of("LegacyList", TypeShape::integer()));

        let err = UnitBuilder::new("Modern")
            .attribute(contract.clone())
            .build_in(&configuration)
            .unwrap_err();
        assert_eq!(err.code(), codes::UNRESOLVED_SHAPE);

        let legacy = UnitBuilder::new("Old")
            .generation(Generation::Legacy)
            .attribute(contract)
            .build_in(&configuration)
            .unwrap();
        let outcome = legacy.call_in(&configuration, [("items", Value::seq("LegacyList", [1, 2]))]);
        assert_success(&outcome);

        let err = legacy.migrate_to(Generation::Current, &configuration).unwrap_err();
        assert_eq!(err.code(), codes::UNRESOLVED_SHAPE);

        configuration.configure(Generation::Current, |scope| {
            scope.register(ClassificationMode::CollectionLike, "LegacyList");
        });
        let migrated = legacy.migrate_to(Generation::Current, &configuration).unwrap();
        assert_eq!(migrated.generation(), Generation::Current);
        assert_success(&migrated.call_in(&configuration, [("items", Value::seq("LegacyList", [3]))]));
    }

    #[test]
    fn test_call_json() {
        let configuration = Configuration::new();
        let unit = copy_id_unit(&configuration).unwrap();

        let outcome = unit.call_json(serde_json::json!({"id": "abc"}));
        assert_output_value(&outcome, "id", &Value::from("abc"));

        let outcome = unit.call_json(serde_json::json!(["abc"]));
        assert_violation(&outcome, "CopyId", ViolationReason::WrongType);
    }

    #[test]
    fn test_info_describes_declaration() {
        let configuration = isolated_configuration();
        let unit = UnitBuilder::new("Describe")
            .attribute(
                AttributeContract::input("email_address", TypeShape::string())
                    .with_alias("email")
                    .with_note("Where to send the receipt"),
            )
            .attribute(AttributeContract::output("ids", TypeShape::array_of(TypeShape::integer())))
            .with_step(Step::new("noop", |_| Ok(())))
            .build_in(&configuration)
            .unwrap();

        let info = serde_json::to_value(unit.info()).unwrap();
        assert_eq!(info["name"], "Describe");
        assert_eq!(info["generation"], "current");
        assert_eq!(info["inputs"][0]["alias"], "email");
        assert_eq!(info["outputs"][0]["types"][0], "Array<Integer>");
        assert_eq!(info["steps"], serde_json::json!(["noop"]));
    }

    #[test]
    fn test_definition_is_shared_across_threads() {
        let configuration = Arc::new(isolated_configuration());
        let unit = Arc::new(copy_id_unit(&configuration).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let unit = Arc::clone(&unit);
                let configuration = Arc::clone(&configuration);
                std::thread::spawn(move || {
                    let id = format!("id-{n}");
                    let outcome = unit.call_in(&configuration, [("id", id.as_str())]);
                    outcome.outputs().and_then(|o| o.get("id")).cloned() == Some(Value::from(id))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_outcome_into_result() {
        let configuration = isolated_configuration();
        let unit = copy_id_unit(&configuration).unwrap();
        let outputs = unit.call_in(&configuration, [("id", "x")]).into_result().unwrap();
        assert_eq!(outputs.get("id"), Some(&Value::from("x")));

        let outcome: Outcome = unit.call_in(&configuration, TestInputs::new());
        assert!(outcome.into_result().is_err());
    }
}
