//! End-to-end translation tests: LA source in, C text out.

use lacc_compile::compile_to_output;

#[test]
fn minimal_read_write_program_translates_exactly() {
    let source = "algoritmo \"x\"\nvar declare x: inteiro\ninicio\nleia(x)\nescreva(x)\nfim";
    let output = compile_to_output(source);
    assert_eq!(
        output,
        "#include <stdio.h>\n\
         #include <stdlib.h>\n\
         #include <string.h>\n\
         \n\
         int main() {\n\
         \tint x;\n\
         \tscanf(\"%d\",&x);\n\
         \tprintf(\"%d\",x);\n\
         \treturn 0;\n\
         }\n"
    );
}

#[test]
fn case_range_expands_to_consecutive_labels() {
    let source = "algoritmo \"c\"\n\
                  declare v: inteiro\n\
                  inicio\n\
                  leia(v)\n\
                  caso v seja\n\
                  1..3: escreva(\"baixo\")\n\
                  senao escreva(\"alto\")\n\
                  fimcaso\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tswitch (v) {\n"));
    // the range shares one body behind three consecutive labels
    assert!(output.contains(
        "\t\tcase 1:\n\t\tcase 2:\n\t\tcase 3:\n\t\t\tprintf(\"%s\",\"baixo\");\n\t\t\tbreak;\n"
    ));
    assert!(output.contains("\t\tdefault:\n\t\t\tprintf(\"%s\",\"alto\");\n\t\t\tbreak;\n"));
}

#[test]
fn constants_become_defines_and_substitute() {
    let source = "algoritmo \"k\"\n\
                  constante MAX: inteiro = 100\n\
                  declare x: inteiro\n\
                  inicio\n\
                  x <- MAX\n\
                  escreva(MAX)\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("#define MAX 100\n"));
    assert!(output.contains("\tx = 100;\n"));
    assert!(output.contains("\tprintf(\"%d\",100);\n"));
}

#[test]
fn records_translate_to_typedef_structs() {
    let source = "algoritmo \"cadastro\"\n\
                  tipo pessoa: registro nome: literal idade: inteiro fimregistro\n\
                  declare p: pessoa\n\
                  inicio\n\
                  p.nome <- \"Ana\"\n\
                  p.idade <- 30\n\
                  escreva(p.nome, p.idade)\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("typedef struct {\n\tchar nome[80];\n\tint idade;\n} pessoa;\n"));
    assert!(output.contains("\tpessoa p;\n"));
    // string literal into a string field goes through strcpy
    assert!(output.contains("\tstrcpy(p.nome, \"Ana\");\n"));
    assert!(output.contains("\tp.idade = 30;\n"));
    // formats come from the declared field types
    assert!(output.contains("\tprintf(\"%s%d\",p.nome,p.idade);\n"));
}

#[test]
fn inline_record_gets_synthetic_typedef() {
    let source = "algoritmo \"i\"\n\
                  declare p: registro nome: literal fimregistro\n\
                  inicio\n\
                  p.nome <- \"Bia\"\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("typedef struct {\n\tchar nome[80];\n} __rec_2_12;\n"));
    assert!(output.contains("\t__rec_2_12 p;\n"));
    assert!(output.contains("\tstrcpy(p.nome, \"Bia\");\n"));
}

#[test]
fn type_alias_translates_to_typedef() {
    let source = "algoritmo \"a\"\n\
                  tipo idade: inteiro\n\
                  declare a: idade\n\
                  inicio\n\
                  a <- 1\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("typedef int idade;\n"));
    assert!(output.contains("\ta = 1;\n"));
}

#[test]
fn string_variables_read_with_fgets() {
    let source = "algoritmo \"s\"\n\
                  declare nome: literal\n\
                  inicio\n\
                  leia(nome)\n\
                  escreva(nome)\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tchar nome[80];\n"));
    assert!(output.contains("\tfgets(nome, 80, stdin);\n"));
    assert!(output.contains("\tnome[strcspn(nome, \"\\n\")] = '\\0';\n"));
    assert!(output.contains("\tprintf(\"%s\",nome);\n"));
}

#[test]
fn pointers_translate_to_c_pointers() {
    let source = "algoritmo \"p\"\n\
                  declare ptr: ^inteiro\n\
                  declare x: inteiro\n\
                  inicio\n\
                  ptr <- &x\n\
                  ^ptr <- 3\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tint* ptr;\n"));
    assert!(output.contains("\tptr = &x;\n"));
    assert!(output.contains("\t*ptr = 3;\n"));
}

#[test]
fn for_loop_is_inclusive() {
    let source = "algoritmo \"f\"\n\
                  declare i, soma: inteiro\n\
                  inicio\n\
                  soma <- 0\n\
                  para i <- 1 ate 10 faca\n\
                  soma <- soma + i\n\
                  fimpara\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tfor (i = 1; i <= 10; i++) {\n"));
    assert!(output.contains("\t\tsoma = soma + i;\n"));
}

#[test]
fn while_and_do_until_loops_translate() {
    let source = "algoritmo \"l\"\n\
                  declare x: inteiro\n\
                  inicio\n\
                  enquanto x > 0 faca\n\
                  x <- x - 1\n\
                  fimenquanto\n\
                  faca\n\
                  leia(x)\n\
                  ate x > 0\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\twhile (x > 0) {\n\t\tx = x - 1;\n\t}\n"));
    // the guard is emitted as written
    assert!(output.contains("\tdo {\n\t\tscanf(\"%d\",&x);\n\t} while (x > 0);\n"));
}

#[test]
fn if_else_bodies_are_emitted_exactly_once() {
    let source = "algoritmo \"se\"\n\
                  declare x: inteiro\n\
                  inicio\n\
                  se x > 0 entao\n\
                  escreva(\"positivo\")\n\
                  senao\n\
                  escreva(\"demais\")\n\
                  fimse\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tif (x > 0) {\n"));
    assert!(output.contains("\t} else {\n"));
    assert_eq!(output.matches("printf(\"%s\",\"positivo\");").count(), 1);
    assert_eq!(output.matches("printf(\"%s\",\"demais\");").count(), 1);
}

#[test]
fn logical_operators_rewrite_to_c() {
    let source = "algoritmo \"op\"\n\
                  declare x: inteiro\n\
                  declare b: logico\n\
                  inicio\n\
                  b <- verdadeiro\n\
                  se x = 1 e nao (x < 2) ou x <> 3 entao\n\
                  x <- 0\n\
                  fimse\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tb = 1;\n"));
    assert!(output.contains("if (x == 1 && !(x < 2) || x != 3) {"));
}

#[test]
fn function_and_procedure_definitions_precede_main() {
    let source = "algoritmo \"sub\"\n\
                  declare x: inteiro\n\
                  funcao dobro(n: inteiro): inteiro\n\
                  inicio\n\
                  retorne n * 2\n\
                  fimfuncao\n\
                  procedimento mostra(s: literal)\n\
                  inicio\n\
                  escreva(s)\n\
                  fimprocedimento\n\
                  inicio\n\
                  mostra(\"oi\")\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("int dobro(int n) {\n\treturn n * 2;\n}\n"));
    assert!(output.contains("void mostra(char* s) {\n\tprintf(\"%s\",s);\n}\n"));
    assert!(output.contains("\tmostra(\"oi\");\n"));
    // definitions come before main
    let main_at = output.find("int main()").unwrap();
    assert!(output.find("int dobro").unwrap() < main_at);
    assert!(output.find("void mostra").unwrap() < main_at);
}

#[test]
fn subroutine_locals_are_declared_before_the_body() {
    let source = "algoritmo \"loc\"\n\
                  procedimento conta()\n\
                  declare i: inteiro\n\
                  inicio\n\
                  i <- 0\n\
                  fimprocedimento\n\
                  inicio\n\
                  conta()\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("void conta() {\n\tint i;\n\ti = 0;\n}\n"));
}

#[test]
fn real_expressions_print_with_float_format() {
    let source = "algoritmo \"r\"\n\
                  declare media: real\n\
                  declare n: inteiro\n\
                  inicio\n\
                  media <- 2.5\n\
                  escreva(media, media + n, n)\n\
                  fim";
    let output = compile_to_output(source);
    // any real operand makes the whole expression print as %f
    assert!(output.contains("\tprintf(\"%f%f%d\",media,media + n,n);\n"));
}

#[test]
fn integer_arrays_keep_their_bound() {
    let source = "algoritmo \"v\"\n\
                  declare v[10]: inteiro\n\
                  declare i: inteiro\n\
                  inicio\n\
                  v[i] <- 1\n\
                  escreva(v[i])\n\
                  fim";
    let output = compile_to_output(source);
    assert!(output.contains("\tint v[10];\n"));
    assert!(output.contains("\tv[i] = 1;\n"));
    assert!(output.contains("\tprintf(\"%d\",v[i]);\n"));
}

#[test]
fn main_always_closes_with_return_zero() {
    let output = compile_to_output("algoritmo \"fim\" inicio fim");
    assert!(output.ends_with("int main() {\n\treturn 0;\n}\n"));
}
