use pseudo9608::{error::Error, interpreter::io::MemoryIo, run_source_with_io};

fn run(src: &str) -> String {
    let mut io = MemoryIo::new();
    if let Err(e) = run_source_with_io(src, &mut io) {
        panic!("Script failed: {e}");
    }
    io.output().to_string()
}

fn run_with_input(src: &str, input: &[&str]) -> String {
    let mut io = MemoryIo::with_input(input);
    if let Err(e) = run_source_with_io(src, &mut io) {
        panic!("Script failed: {e}");
    }
    io.output().to_string()
}

fn run_err(src: &str) -> Error {
    let mut io = MemoryIo::new();
    match run_source_with_io(src, &mut io) {
        Ok(()) => panic!("Script succeeded but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn hello_world() {
    assert_eq!(run("OUTPUT \"Hello World!\""), "Hello World!\n");
}

#[test]
fn output_concatenates_without_separator() {
    assert_eq!(run("OUTPUT 1, \" and \", 2"), "1 and 2\n");
    assert_eq!(run("OUTPUT TRUE, FALSE"), "TRUEFALSE\n");
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(run("OUTPUT 1 + 2 * 3"), "7\n");
    assert_eq!(run("OUTPUT (1 + 2) * 3"), "9\n");
    assert_eq!(run("OUTPUT 8 - 5"), "3\n");
    assert_eq!(run("OUTPUT -3 + 5"), "2\n");
}

#[test]
fn division_always_produces_real() {
    assert_eq!(run("OUTPUT 10 / 2"), "5.0\n");
    assert_eq!(run("OUTPUT 7 / 2"), "3.5\n");
}

#[test]
fn real_output_keeps_a_fractional_digit() {
    assert_eq!(run("OUTPUT 3.0"), "3.0\n");
    assert_eq!(run("OUTPUT 2.5"), "2.5\n");
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(run("OUTPUT 2 < 3"), "TRUE\n");
    assert_eq!(run("OUTPUT 2 >= 3"), "FALSE\n");
    assert_eq!(run("OUTPUT 2 <> 3"), "TRUE\n");
    assert_eq!(run("OUTPUT \"a\" = \"a\""), "TRUE\n");
    assert_eq!(run("OUTPUT TRUE AND FALSE"), "FALSE\n");
    assert_eq!(run("OUTPUT TRUE OR FALSE"), "TRUE\n");
    assert_eq!(run("OUTPUT NOT FALSE"), "TRUE\n");
    assert_eq!(run("OUTPUT NOT 1 = 2"), "TRUE\n");
}

#[test]
fn logic_short_circuits() {
    // The division would fail if the right operand were evaluated.
    let src = "DECLARE n : INTEGER\n\
               n <- 0\n\
               OUTPUT n = 0 OR 1 / n > 1.0\n";
    assert_eq!(run(src), "TRUE\n");
}

#[test]
fn declare_assign_output() {
    let src = "DECLARE x : INTEGER\n\
               x <- 41\n\
               x <- x + 1\n\
               OUTPUT x\n";
    assert_eq!(run(src), "42\n");
}

#[test]
fn integer_widens_to_real_on_assignment() {
    let src = "DECLARE x : REAL\n\
               x <- 3\n\
               OUTPUT x\n";
    assert_eq!(run(src), "3.0\n");
}

#[test]
fn real_does_not_narrow_to_integer() {
    let src = "DECLARE x : INTEGER\n\
               x <- 3.0\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn accumulating_for_loop() {
    let src = "DECLARE T : INTEGER\n\
               T <- 0\n\
               FOR I <- 1 TO 5\n\
                 T <- T + I\n\
               ENDFOR\n\
               OUTPUT T\n";
    assert_eq!(run(src), "15\n");
}

#[test]
fn for_loop_with_negative_step() {
    let src = "FOR I <- 5 TO 1 STEP -1\n\
                 OUTPUT I\n\
               ENDFOR\n";
    assert_eq!(run(src), "5\n4\n3\n2\n1\n");
}

#[test]
fn for_loop_runs_zero_times_against_the_step() {
    let src = "FOR I <- 5 TO 1\n\
                 OUTPUT I\n\
               ENDFOR\n\
               OUTPUT \"done\"\n";
    assert_eq!(run(src), "done\n");
}

#[test]
fn for_loop_tolerates_a_trailing_name() {
    let src = "FOR Row <- 1 TO 2\n\
                 OUTPUT Row\n\
               ENDFOR Row\n";
    assert_eq!(run(src), "1\n2\n");
}

#[test]
fn for_step_zero_is_a_runtime_error() {
    let src = "FOR I <- 1 TO 5 STEP 0\n\
                 OUTPUT I\n\
               ENDFOR\n";
    assert!(matches!(run_err(src), Error::Runtime(_)));
}

#[test]
fn while_loop() {
    let src = "DECLARE n : INTEGER\n\
               n <- 3\n\
               WHILE n > 0 DO\n\
                 OUTPUT n\n\
                 n <- n - 1\n\
               ENDWHILE\n";
    assert_eq!(run(src), "3\n2\n1\n");
}

#[test]
fn repeat_loop_runs_at_least_once() {
    let src = "DECLARE n : INTEGER\n\
               n <- 10\n\
               REPEAT\n\
                 OUTPUT n\n\
                 n <- n + 1\n\
               UNTIL n > 10\n";
    assert_eq!(run(src), "10\n");
}

#[test]
fn if_then_else() {
    let src = "DECLARE n : INTEGER\n\
               n <- 7\n\
               IF n > 5\n\
                 THEN\n\
                   OUTPUT \"big\"\n\
                 ELSE\n\
                   OUTPUT \"small\"\n\
               ENDIF\n";
    assert_eq!(run(src), "big\n");
}

#[test]
fn case_selects_the_first_matching_arm() {
    let src = "DECLARE x : STRING\n\
               x <- \"Hi\"\n\
               CASE OF x\n\
                 \"Hello\" : OUTPUT \"greeting\"\n\
                 \"Hi\" : OUTPUT \"informal\"\n\
                 OTHERWISE : OUTPUT \"unknown\"\n\
               ENDCASE\n";
    assert_eq!(run(src), "informal\n");
}

#[test]
fn case_falls_back_to_otherwise() {
    let src = "DECLARE x : INTEGER\n\
               x <- 9\n\
               CASE OF x\n\
                 1 : OUTPUT \"one\"\n\
                 2 : OUTPUT \"two\"\n\
                 OTHERWISE : OUTPUT \"many\"\n\
               ENDCASE\n";
    assert_eq!(run(src), "many\n");
}

#[test]
fn case_arm_type_must_match_the_subject() {
    let src = "DECLARE x : STRING\n\
               x <- \"Hi\"\n\
               CASE OF x\n\
                 \"Hello\" : OUTPUT \"greeting\"\n\
                 0 : OUTPUT \"number\"\n\
               ENDCASE\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn procedure_with_byref_swap() {
    let src = "DECLARE A : INTEGER\n\
               DECLARE B : INTEGER\n\
               PROCEDURE SWAP(BYREF X : INTEGER, BYREF Y : INTEGER)\n\
                 DECLARE T : INTEGER\n\
                 T <- X\n\
                 X <- Y\n\
                 Y <- T\n\
               ENDPROCEDURE\n\
               A <- 1\n\
               B <- 2\n\
               CALL SWAP(A, B)\n\
               OUTPUT A, \" \", B\n";
    assert_eq!(run(src), "2 1\n");
}

#[test]
fn byvalue_arguments_copy() {
    let src = "DECLARE A : INTEGER\n\
               PROCEDURE BUMP(X : INTEGER)\n\
                 X <- X + 1\n\
               ENDPROCEDURE\n\
               A <- 1\n\
               CALL BUMP(A)\n\
               OUTPUT A\n";
    assert_eq!(run(src), "1\n");
}

#[test]
fn byref_array_element() {
    let src = "DECLARE Data : ARRAY[1:3] OF INTEGER\n\
               PROCEDURE CLEAR(BYREF X : INTEGER)\n\
                 X <- 0\n\
               ENDPROCEDURE\n\
               Data[2] <- 5\n\
               CALL CLEAR(Data[2])\n\
               OUTPUT Data[2]\n";
    assert_eq!(run(src), "0\n");
}

#[test]
fn byref_whole_array_bubble_sort() {
    let src = "DECLARE Data : ARRAY[1:5] OF INTEGER\n\
               DECLARE i : INTEGER\n\
               PROCEDURE Sort(BYREF Data : ARRAY[1:5] OF INTEGER, Length : INTEGER)\n\
                 DECLARE i : INTEGER\n\
                 DECLARE j : INTEGER\n\
                 DECLARE Temp : INTEGER\n\
                 FOR i <- 1 TO Length - 1\n\
                   FOR j <- 1 TO Length - i\n\
                     IF Data[j] > Data[j + 1]\n\
                       THEN\n\
                         Temp <- Data[j]\n\
                         Data[j] <- Data[j + 1]\n\
                         Data[j + 1] <- Temp\n\
                     ENDIF\n\
                   ENDFOR\n\
                 ENDFOR\n\
               ENDPROCEDURE\n\
               Data[1] <- 4\n\
               Data[2] <- 1\n\
               Data[3] <- 5\n\
               Data[4] <- 3\n\
               Data[5] <- 2\n\
               CALL Sort(Data, 5)\n\
               FOR i <- 1 TO 5\n\
                 OUTPUT Data[i]\n\
               ENDFOR\n";
    assert_eq!(run(src), "1\n2\n3\n4\n5\n");
}

#[test]
fn recursive_function() {
    let src = "FUNCTION F(N : INTEGER) RETURNS INTEGER\n\
                 IF N <= 1\n\
                   THEN\n\
                     RETURN 1\n\
                   ELSE\n\
                     RETURN N * F(N - 1)\n\
                 ENDIF\n\
               ENDFUNCTION\n\
               OUTPUT F(5)\n";
    assert_eq!(run(src), "120\n");
}

#[test]
fn function_result_widens_into_a_real_slot() {
    let src = "DECLARE x : REAL\n\
               FUNCTION Two() RETURNS INTEGER\n\
                 RETURN 2\n\
               ENDFUNCTION\n\
               x <- Two()\n\
               OUTPUT x\n";
    assert_eq!(run(src), "2.0\n");
}

#[test]
fn record_and_array_of_records() {
    let src = "TYPE Point\n\
                 DECLARE X : INTEGER\n\
                 DECLARE Y : INTEGER\n\
               ENDTYPE\n\
               DECLARE Pts : ARRAY[1:2] OF Point\n\
               Pts[1].X <- 3\n\
               Pts[1].Y <- 4\n\
               OUTPUT Pts[1].X + Pts[1].Y\n";
    assert_eq!(run(src), "7\n");
}

#[test]
fn whole_array_assignment_copies() {
    let src = "DECLARE A : ARRAY[1:3] OF INTEGER\n\
               DECLARE B : ARRAY[1:3] OF INTEGER\n\
               DECLARE I : INTEGER\n\
               FOR I <- 1 TO 3\n\
                 A[I] <- I * 10\n\
               ENDFOR\n\
               B <- A\n\
               A[3] <- 0\n\
               OUTPUT B[3]\n";
    assert_eq!(run(src), "30\n");
}

#[test]
fn whole_array_assignment_requires_matching_shape() {
    let src = "DECLARE A : ARRAY[1:3] OF INTEGER\n\
               DECLARE B : ARRAY[1:4] OF INTEGER\n\
               B <- A\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn two_dimensional_arrays() {
    let src = "DECLARE G : ARRAY[1:2, 1:3] OF INTEGER\n\
               G[2, 3] <- 9\n\
               G[1, 1] <- 1\n\
               OUTPUT G[2, 3] + G[1, 1]\n";
    assert_eq!(run(src), "10\n");
}

#[test]
fn array_bounds_are_checked_at_runtime() {
    let src = "DECLARE A : ARRAY[1:3] OF INTEGER\n\
               A[4] <- 1\n";
    assert!(matches!(run_err(src), Error::Runtime(_)));
}

#[test]
fn input_coerces_to_the_target_type() {
    let src = "DECLARE N : INTEGER\n\
               INPUT N\n\
               OUTPUT N * 2\n";
    assert_eq!(run_with_input(src, &["42"]), "84\n");
}

#[test]
fn input_keeps_strings_verbatim() {
    let src = "DECLARE S : STRING\n\
               INPUT S\n\
               OUTPUT S\n";
    assert_eq!(run_with_input(src, &["  spaced  "]), "  spaced  \n");
}

#[test]
fn input_coercion_failure_is_a_runtime_error() {
    let src = "DECLARE N : INTEGER\n\
               INPUT N\n";
    let mut io = MemoryIo::with_input(&["not a number"]);
    let err = run_source_with_io(src, &mut io).unwrap_err();
    assert!(matches!(err, Error::Runtime(_)));
}

#[test]
fn string_builtins() {
    assert_eq!(run("OUTPUT LENGTH(\"hello\")"), "5\n");
    assert_eq!(run("OUTPUT MID(\"ABCDEF\", 2, 3)"), "BCD\n");
    assert_eq!(run("OUTPUT LEFT(\"ABCDEF\", 2)"), "AB\n");
    assert_eq!(run("OUTPUT RIGHT(\"ABCDEF\", 2)"), "EF\n");
    assert_eq!(run("OUTPUT ASC(\"A\")"), "65\n");
}

#[test]
fn numeric_builtins() {
    assert_eq!(run("OUTPUT INT(3.7)"), "3\n");
    assert_eq!(run("OUTPUT INT(2)"), "2\n");
    assert_eq!(run("OUTPUT RANDOMBETWEEN(1, 6) >= 1"), "TRUE\n");
    assert_eq!(run("OUTPUT RANDOMBETWEEN(1, 6) <= 6"), "TRUE\n");
    assert_eq!(run("OUTPUT RND() < 1.0"), "TRUE\n");
    assert_eq!(run("OUTPUT RND() >= 0.0"), "TRUE\n");
}

#[test]
fn builtin_domain_errors() {
    assert!(matches!(run_err("OUTPUT MID(\"AB\", 5, 1)"), Error::Runtime(_)));
    assert!(matches!(run_err("OUTPUT ASC(\"AB\")"), Error::Runtime(_)));
    assert!(matches!(run_err("OUTPUT RANDOMBETWEEN(6, 1)"), Error::Runtime(_)));
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    assert!(matches!(run_err("OUTPUT 1 / 0"), Error::Runtime(_)));
}

#[test]
fn reading_an_unassigned_variable_is_a_runtime_error() {
    let src = "DECLARE x : INTEGER\n\
               OUTPUT x\n";
    assert!(matches!(run_err(src), Error::Runtime(_)));
}

#[test]
fn undeclared_name_is_a_resolve_error() {
    assert!(matches!(run_err("OUTPUT missing"), Error::Resolve(_)));
}

#[test]
fn redeclaration_is_a_resolve_error() {
    let src = "DECLARE x : INTEGER\n\
               DECLARE x : REAL\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn return_in_a_procedure_is_a_resolve_error() {
    let src = "PROCEDURE P()\n\
                 RETURN 1\n\
               ENDPROCEDURE\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn byref_rejects_expressions() {
    let src = "DECLARE A : INTEGER\n\
               PROCEDURE CLEAR(BYREF X : INTEGER)\n\
                 X <- 0\n\
               ENDPROCEDURE\n\
               A <- 1\n\
               CALL CLEAR(A + 1)\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn function_without_a_guaranteed_return_is_rejected() {
    let src = "FUNCTION G(N : INTEGER) RETURNS INTEGER\n\
                 IF N > 0\n\
                   THEN\n\
                     RETURN 1\n\
                 ENDIF\n\
               ENDFUNCTION\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn calling_a_function_with_call_is_rejected() {
    let src = "FUNCTION F() RETURNS INTEGER\n\
                 RETURN 1\n\
               ENDFUNCTION\n\
               CALL F()\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn wrong_arity_is_a_resolve_error() {
    let src = "FUNCTION F(A : INTEGER, B : INTEGER) RETURNS INTEGER\n\
                 RETURN A + B\n\
               ENDFUNCTION\n\
               OUTPUT F(3)\n";
    assert!(matches!(run_err(src), Error::Resolve(_)));
}

#[test]
fn string_ordering_is_rejected() {
    assert!(matches!(run_err("OUTPUT \"a\" < \"b\""), Error::Resolve(_)));
}

#[test]
fn chained_comparisons_are_a_parse_error() {
    assert!(matches!(run_err("OUTPUT 1 < 2 < 3"), Error::Parse(_)));
}

#[test]
fn missing_terminator_is_a_parse_error() {
    assert!(matches!(run_err("IF TRUE\n"), Error::Parse(_)));
}

#[test]
fn scan_errors() {
    assert!(matches!(run_err("OUTPUT \"abc"), Error::Scan(_)));
    assert!(matches!(run_err("OUTPUT 3."), Error::Scan(_)));
    assert!(matches!(run_err("OUTPUT 1 ~ 2"), Error::Scan(_)));
    assert!(matches!(run_err("OUTPUT 99999999999999999999"), Error::Scan(_)));
}

#[test]
fn error_messages_carry_positions() {
    let err = run_err("DECLARE x : INTEGER\nx <- \"seven\"\n");
    let message = err.to_string();
    assert!(message.starts_with("ResolveError at line 2"), "{message}");
}

#[test]
fn runtime_errors_name_the_active_callable() {
    let src = "PROCEDURE Crash()\n\
                 OUTPUT 1 / 0\n\
               ENDPROCEDURE\n\
               CALL Crash()\n";
    let message = run_err(src).to_string();
    assert!(message.contains("Crash"), "{message}");
}

#[test]
fn comments_are_ignored() {
    let src = "// a comment line\n\
               OUTPUT 1 // trailing comment\n";
    assert_eq!(run(src), "1\n");
}

#[test]
fn crlf_sources_are_accepted() {
    assert_eq!(run("DECLARE x : INTEGER\r\nx <- 5\r\nOUTPUT x\r\n"), "5\n");
}
